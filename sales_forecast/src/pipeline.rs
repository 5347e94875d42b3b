//! End-to-end forecast pipeline
//!
//! A [`PipelineContext`] holds what is fitted once per run: the loaded data,
//! the category encoders and the trained model. [`ForecastPipeline`] drives
//! the stages in order and returns a [`ForecastReport`].

use crate::aggregate::{monthly_actual, monthly_predicted, MonthlyComparison};
use crate::calendar::HolidayCalendar;
use crate::config::ForecastConfig;
use crate::data::SalesData;
use crate::encoding::CategoryEncoders;
use crate::error::Result;
use crate::features::{training_set, FeatureRow};
use crate::generator::{FeatureGenerator, GeneratedFeatures, SyntheticRow};
use crate::horizon::{lookback_cutoff, ForecastHorizon, ForecastWindow};
use crate::models::{GradientBoosting, SalesModel, TrainedGradientBoosting, TrainedSalesModel};
use crate::utils::{round_half_even, ForecastAccuracy};
use rand::Rng;
use tracing::{debug, info};

/// State fitted once per run and shared by every later stage
#[derive(Debug)]
pub struct PipelineContext<T: TrainedSalesModel> {
    data: SalesData,
    encoders: CategoryEncoders,
    holidays: HolidayCalendar,
    model: T,
    training_fit: ForecastAccuracy,
}

impl<T: TrainedSalesModel> PipelineContext<T> {
    /// Fit encoders and the model over the full history
    pub fn fit<M>(data: SalesData, model: &M, holidays: HolidayCalendar) -> Result<Self>
    where
        M: SalesModel<Trained = T>,
    {
        let encoders = CategoryEncoders::fit(&data)?;
        debug!(
            products = encoders.product.len(),
            categories = encoders.category.len(),
            "fitted encoders"
        );

        let (rows, targets) = training_set(&data, &encoders, &holidays)?;
        let trained = model.train(&rows, &targets)?;
        let training_fit = trained.evaluate(&rows, &targets)?;
        info!(model = trained.name(), fit = %training_fit, "model trained");

        Ok(Self {
            data,
            encoders,
            holidays,
            model: trained,
            training_fit,
        })
    }

    pub fn data(&self) -> &SalesData {
        &self.data
    }

    pub fn encoders(&self) -> &CategoryEncoders {
        &self.encoders
    }

    pub fn holidays(&self) -> &HolidayCalendar {
        &self.holidays
    }

    pub fn model(&self) -> &T {
        &self.model
    }

    pub fn training_fit(&self) -> ForecastAccuracy {
        self.training_fit
    }

    /// Window following the latest historical date
    pub fn window(&self, horizon: ForecastHorizon) -> Result<ForecastWindow> {
        ForecastWindow::after(self.data.latest_date(), horizon)
    }

    /// Synthesize future rows for every product
    pub fn generate<R: Rng>(
        &self,
        window: &ForecastWindow,
        generator: &mut FeatureGenerator<R>,
    ) -> Result<GeneratedFeatures> {
        generator.generate(&self.data, &self.encoders, window, &self.holidays)
    }

    /// Predicted daily units, rounded and floored at zero
    pub fn predict_units(&self, rows: &[SyntheticRow]) -> Result<Vec<u64>> {
        let features: Vec<FeatureRow> = rows.iter().map(|r| r.features).collect();
        let raw = self.model.predict(&features)?;
        Ok(raw
            .into_iter()
            .map(|v| round_half_even(v).max(0.0) as u64)
            .collect())
    }

    /// Run generation, prediction and aggregation for one horizon
    pub fn forecast<R: Rng>(
        &self,
        horizon: ForecastHorizon,
        generator: &mut FeatureGenerator<R>,
    ) -> Result<ForecastReport> {
        let window = self.window(horizon)?;
        let generated = self.generate(&window, generator)?;
        let predicted_units = self.predict_units(&generated.rows)?;
        info!(
            rows = generated.rows.len(),
            start = %window.start(),
            end = %window.end(),
            "predicted future sales"
        );

        let cutoff = lookback_cutoff(self.data.latest_date(), horizon)?;
        let predicted = monthly_predicted(&generated.rows, &predicted_units)?;
        let actual = monthly_actual(&self.data, cutoff);
        let comparison = MonthlyComparison::merge(&predicted, &actual);

        Ok(ForecastReport {
            horizon,
            window,
            rows: generated.rows,
            predicted_units,
            skipped_products: generated.skipped_products,
            comparison,
            training_fit: self.training_fit,
        })
    }
}

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct ForecastReport {
    pub horizon: ForecastHorizon,
    pub window: ForecastWindow,
    /// Synthetic feature rows, in generation order
    pub rows: Vec<SyntheticRow>,
    /// Rounded prediction for each row
    pub predicted_units: Vec<u64>,
    pub skipped_products: Vec<String>,
    pub comparison: MonthlyComparison,
    pub training_fit: ForecastAccuracy,
}

/// Configured pipeline: fit, generate, predict, aggregate
#[derive(Debug, Clone)]
pub struct ForecastPipeline {
    config: ForecastConfig,
}

impl ForecastPipeline {
    pub fn new(config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fit the context for `data` using the configured model
    pub fn fit(&self, data: SalesData) -> Result<PipelineContext<TrainedGradientBoosting>> {
        let model = GradientBoosting::new(&self.config.model)?;
        PipelineContext::fit(data, &model, self.config.holiday_calendar()?)
    }

    /// Full run over `data` with the configured horizon and seed
    pub fn run(&self, data: SalesData) -> Result<ForecastReport> {
        let context = self.fit(data)?;
        let mut generator =
            FeatureGenerator::seeded(self.config.sampling.clone(), self.config.seed)?;
        context.forecast(self.config.horizon, &mut generator)
    }
}
