use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use msme_forecast::Dashboard;
use sales_forecast::horizon::ForecastHorizon;
use sales_forecast::ForecastConfig;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "msme-forecast",
    about = "Forecast monthly unit sales per product from a transaction CSV",
    version
)]
struct Cli {
    #[arg(short, long, help = "Sales CSV to forecast; the bundled sample is used when omitted")]
    file: Option<PathBuf>,
    #[arg(long, help = "Forecast horizon in months (1, 3 or 6)")]
    horizon: Option<ForecastHorizon>,
    #[arg(long, help = "Seed for the synthetic feature draws")]
    seed: Option<u64>,
    #[arg(short, long, help = "TOML configuration file")]
    config: Option<PathBuf>,
    #[arg(short, long, help = "Where to write the forecast CSV")]
    output: Option<PathBuf>,
    #[arg(long, help = "Directory for the HTML chart")]
    chart_dir: Option<PathBuf>,
    #[arg(long, action = ArgAction::SetTrue, help = "Print the forecast table")]
    table: bool,
    #[arg(long, action = ArgAction::SetTrue, help = "Do not write the HTML chart")]
    no_chart: bool,
    #[arg(short, long, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
}

impl Cli {
    fn forecast_config(&self) -> Result<ForecastConfig> {
        let mut config = match &self.config {
            Some(path) => ForecastConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ForecastConfig::default(),
        };

        if let Some(horizon) = self.horizon {
            config.horizon = horizon;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(path) = &self.output {
            config.output.csv_path = path.clone();
        }
        if let Some(dir) = &self.chart_dir {
            config.output.chart_dir = dir.clone();
        }
        Ok(config)
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let directive = std::env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty() && verbose == 0)
        .unwrap_or_else(|| level.to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_target(false)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    info!(
        library = sales_forecast::NAME,
        version = sales_forecast::VERSION,
        "starting forecast"
    );

    let config = cli.forecast_config()?;
    let mut dashboard = Dashboard::new(config).context("invalid forecast configuration")?;
    if cli.no_chart {
        dashboard = dashboard.without_chart();
    }

    let output = dashboard
        .run(cli.file.as_deref())
        .context("forecast run failed")?;

    if cli.table {
        println!("{}", output.table());
    }
    println!("{}", output.text_chart(40));
    println!("{}", output.summary());

    Ok(())
}
