use approx::assert_relative_eq;
use pretty_assertions::assert_eq;
use sales_forecast::calendar::HolidayCalendar;
use sales_forecast::data::{SalesData, TransactionRecord};
use sales_forecast::error::Result;
use sales_forecast::features::FeatureRow;
use sales_forecast::generator::{FeatureGenerator, SamplingConfig};
use sales_forecast::horizon::ForecastHorizon;
use sales_forecast::models::{GradientBoosting, ModelConfig};
use sales_forecast::{ForecastError, PipelineContext, SalesModel, TrainedSalesModel};

fn record(date: &str, product: &str, category: &str, units: f64) -> TransactionRecord {
    TransactionRecord {
        date: date.parse().unwrap(),
        product_name: product.to_string(),
        product_category: category.to_string(),
        price_per_unit: 10.0,
        discount_pct: 0.0,
        stock_available: 30.0,
        units_sold: units,
        calendar: None,
    }
}

fn history() -> SalesData {
    let mut records = Vec::new();
    for day in 1..=14 {
        let date = format!("2025-03-{:02}", day);
        records.push(record(&date, "Rice", "Grains", 40.0));
        records.push(record(&date, "Soap", "Household", 3.0));
    }
    SalesData::new(records).unwrap()
}

/// Returns the same raw value for every row
#[derive(Debug, Clone)]
struct ConstantModel(f64);

#[derive(Debug, Clone)]
struct TrainedConstant(f64);

impl SalesModel for ConstantModel {
    type Trained = TrainedConstant;

    fn train(&self, _rows: &[FeatureRow], _targets: &[f64]) -> Result<Self::Trained> {
        Ok(TrainedConstant(self.0))
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

impl TrainedSalesModel for TrainedConstant {
    fn predict(&self, rows: &[FeatureRow]) -> Result<Vec<f64>> {
        Ok(vec![self.0; rows.len()])
    }

    fn name(&self) -> &str {
        "Constant"
    }
}

#[test]
fn test_gradient_boosting_separates_products() {
    let model = GradientBoosting::new(&ModelConfig::default()).unwrap();
    let context = PipelineContext::fit(history(), &model, HolidayCalendar::default()).unwrap();

    let mut generator = FeatureGenerator::seeded(SamplingConfig::default(), Some(1)).unwrap();
    let window = context.window(ForecastHorizon::OneMonth).unwrap();
    let generated = context.generate(&window, &mut generator).unwrap();
    let units = context.predict_units(&generated.rows).unwrap();

    for (row, predicted) in generated.rows.iter().zip(&units) {
        match row.product_name.as_str() {
            "Rice" => assert!((38..=42).contains(predicted), "rice {}", predicted),
            "Soap" => assert!(*predicted <= 5, "soap {}", predicted),
            other => panic!("unexpected product {}", other),
        }
    }
    assert_relative_eq!(context.training_fit().mae, 0.0, epsilon = 0.5);
}

#[test]
fn test_predictions_round_half_to_even() {
    let context =
        PipelineContext::fit(history(), &ConstantModel(2.5), HolidayCalendar::default()).unwrap();
    let mut generator = FeatureGenerator::seeded(SamplingConfig::default(), Some(1)).unwrap();
    let window = context.window(ForecastHorizon::OneMonth).unwrap();
    let generated = context.generate(&window, &mut generator).unwrap();

    let units = context.predict_units(&generated.rows).unwrap();
    assert!(units.iter().all(|&u| u == 2));
}

#[test]
fn test_negative_predictions_clamp_to_zero() {
    let context =
        PipelineContext::fit(history(), &ConstantModel(-3.7), HolidayCalendar::default()).unwrap();
    let report = {
        let mut generator = FeatureGenerator::seeded(SamplingConfig::default(), Some(2)).unwrap();
        context.forecast(ForecastHorizon::OneMonth, &mut generator).unwrap()
    };

    assert!(report.predicted_units.iter().all(|&u| u == 0));
    assert_eq!(report.comparison.total_predicted(), 0);
    // March actuals and zero April predictions for both products
    assert_eq!(report.comparison.len(), 4);
    assert_eq!(report.comparison.total_actual(), 14.0 * 43.0);
}

#[test]
fn test_unseen_category_is_rejected() {
    let model = GradientBoosting::new(&ModelConfig::default()).unwrap();
    let context = PipelineContext::fit(history(), &model, HolidayCalendar::default()).unwrap();

    match context.encoders().product.transform("Tea") {
        Err(ForecastError::UnseenCategory { column, value }) => {
            assert_eq!(column, "Product_Name");
            assert_eq!(value, "Tea");
        }
        other => panic!("expected UnseenCategory, got {:?}", other),
    }
}

#[test]
fn test_model_names() {
    let model = GradientBoosting::new(&ModelConfig::default()).unwrap();
    assert_eq!(
        model.name(),
        "Gradient Boosting (trees=100, learning_rate=0.1)"
    );

    let context = PipelineContext::fit(history(), &model, HolidayCalendar::default()).unwrap();
    assert_eq!(context.model().name(), model.name());
    assert_eq!(context.model().n_trees(), 100);
}
