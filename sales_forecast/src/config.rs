//! Run configuration

use crate::calendar::{HolidayCalendar, DEFAULT_HOLIDAYS};
use crate::error::{ForecastError, Result};
use crate::generator::SamplingConfig;
use crate::horizon::ForecastHorizon;
use crate::models::{GradientBoosting, ModelConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Relative path of the bundled sample file
pub const DEFAULT_DATA_PATH: &str = "data/supermarket_sales_data.csv";

/// Where presentation artefacts go
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub csv_path: PathBuf,
    pub chart_dir: PathBuf,
    pub chart_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("monthly_sales_forecast.csv"),
            chart_dir: PathBuf::from("forecast_charts"),
            chart_file: "monthly_forecast.html".to_string(),
        }
    }
}

/// Everything a forecast run depends on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub horizon: ForecastHorizon,
    /// Seed for the synthetic feature draws; entropy when unset
    pub seed: Option<u64>,
    /// File used when nothing is uploaded
    pub data_path: PathBuf,
    pub holidays: Vec<String>,
    pub sampling: SamplingConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: ForecastHorizon::default(),
            seed: None,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            holidays: DEFAULT_HOLIDAYS.iter().map(|d| d.to_string()).collect(),
            sampling: SamplingConfig::default(),
            model: ModelConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ForecastConfig {
    /// Parse a TOML document; absent keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.sampling.validate()?;
        self.holiday_calendar()?;
        GradientBoosting::new(&self.model)
            .map_err(|e| ForecastError::InvalidParameter(format!("model: {}", e)))?;
        if self.output.chart_file.trim().is_empty() {
            return Err(ForecastError::InvalidParameter(
                "output.chart_file must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn holiday_calendar(&self) -> Result<HolidayCalendar> {
        HolidayCalendar::from_strings(&self.holidays)
    }
}
