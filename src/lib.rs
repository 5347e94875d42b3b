//! # MSME Forecast
//!
//! Dashboard facade over [`sales_forecast`]: pick a data source, run the
//! forecast for the configured horizon and write the CSV and chart outputs.
//!
//! ## Example
//!
//! ```no_run
//! use msme_forecast::Dashboard;
//! use sales_forecast::ForecastConfig;
//!
//! let dashboard = Dashboard::new(ForecastConfig::default())?;
//! let output = dashboard.run(None)?;
//! println!("{}", output.text_chart(40));
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

use sales_forecast::error::Result;
use sales_forecast::report::{render_table, render_text_chart, save_chart, save_csv, to_csv_string};
use sales_forecast::{DataLoader, ForecastConfig, ForecastPipeline, ForecastReport, SalesData};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub use sales_forecast;

/// One forecast session over a configuration
#[derive(Debug, Clone)]
pub struct Dashboard {
    pipeline: ForecastPipeline,
    write_chart: bool,
}

/// What a dashboard run produced and where it was saved
#[derive(Debug, Clone)]
pub struct DashboardOutput {
    pub report: ForecastReport,
    pub csv_path: PathBuf,
    pub chart_path: Option<PathBuf>,
}

impl Dashboard {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        Ok(Self {
            pipeline: ForecastPipeline::new(config)?,
            write_chart: true,
        })
    }

    /// Skip the HTML chart
    pub fn without_chart(mut self) -> Self {
        self.write_chart = false;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        self.pipeline.config()
    }

    /// Uploaded file if given, configured sample file otherwise
    pub fn load(&self, upload: Option<&Path>) -> Result<SalesData> {
        DataLoader::load(upload, &self.config().data_path)
    }

    /// Load, forecast and save outputs
    pub fn run(&self, upload: Option<&Path>) -> Result<DashboardOutput> {
        let data = self.load(upload)?;
        self.run_data(data)
    }

    /// Forecast already loaded data and save outputs
    pub fn run_data(&self, data: SalesData) -> Result<DashboardOutput> {
        let report = self.pipeline.run(data)?;
        for product in &report.skipped_products {
            warn!(product = %product, "product left out of the forecast");
        }

        let output = &self.config().output;
        save_csv(&report.comparison, &output.csv_path)?;
        let chart_path = if self.write_chart {
            Some(save_chart(
                &report.comparison,
                &output.chart_dir,
                &output.chart_file,
            )?)
        } else {
            None
        };

        info!(
            horizon = %report.horizon,
            rows = report.comparison.len(),
            "forecast complete"
        );

        Ok(DashboardOutput {
            report,
            csv_path: output.csv_path.clone(),
            chart_path,
        })
    }
}

impl DashboardOutput {
    pub fn table(&self) -> String {
        render_table(&self.report.comparison)
    }

    pub fn text_chart(&self, bar_width: usize) -> String {
        render_text_chart(&self.report.comparison, bar_width)
    }

    /// CSV body offered for download
    pub fn csv(&self) -> Result<String> {
        to_csv_string(&self.report.comparison)
    }

    /// Short status lines shown after a run
    pub fn summary(&self) -> String {
        let window = &self.report.window;
        let mut lines = vec![
            format!(
                "Forecast {} ({} to {})",
                self.report.horizon,
                window.start(),
                window.end()
            ),
            format!("Training fit: {}", self.report.training_fit),
            format!("CSV saved to {}", self.csv_path.display()),
        ];
        if let Some(path) = &self.chart_path {
            lines.push(format!("Chart saved to {}", path.display()));
        }
        if !self.report.skipped_products.is_empty() {
            lines.push(format!(
                "Skipped products: {}",
                self.report.skipped_products.join(", ")
            ));
        }
        lines.join("\n")
    }
}
