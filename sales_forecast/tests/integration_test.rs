use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::calendar::MonthKey;
use sales_forecast::generator::{PricePolicy, SamplingConfig};
use sales_forecast::horizon::ForecastHorizon;
use sales_forecast::report::{save_chart, save_csv};
use sales_forecast::{DataLoader, ForecastConfig, ForecastPipeline, SalesData};
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

const HEADER: &str =
    "Date,Product_Name,Product_Category,Price_per_Unit,Discount_%,Stock_Available,Units_Sold";

// Five days of a single product
fn single_product_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    writeln!(file, "2025-05-01,A,Grocery,20.0,0,50,10").unwrap();
    writeln!(file, "2025-05-02,A,Grocery,19.0,5,48,12").unwrap();
    writeln!(file, "2025-05-03,A,Grocery,18.0,10,45,15").unwrap();
    writeln!(file, "2025-05-04,A,Grocery,20.0,0,44,14").unwrap();
    writeln!(file, "2025-05-05,A,Grocery,17.0,15,40,9").unwrap();
    file
}

fn two_product_data() -> SalesData {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for day in 1..=20 {
        csv.push_str(&format!("2025-05-{:02},Milk,Dairy,50.0,0,60,{}\n", day, 10 + day % 3));
        csv.push_str(&format!("2025-05-{:02},Bread,Bakery,28.5,5,40,{}\n", day, 4 + day % 2));
    }
    DataLoader::from_bytes(csv.into_bytes()).unwrap()
}

fn config(horizon: ForecastHorizon, seed: u64) -> ForecastConfig {
    ForecastConfig {
        horizon,
        seed: Some(seed),
        ..ForecastConfig::default()
    }
}

#[test]
fn test_single_product_one_month() {
    let file = single_product_file();
    let data = DataLoader::from_csv(file.path()).unwrap();
    let total_actual: f64 = data.records().iter().map(|r| r.units_sold).sum();

    let pipeline = ForecastPipeline::new(config(ForecastHorizon::OneMonth, 42)).unwrap();
    let report = pipeline.run(data).unwrap();

    assert_eq!(report.window.start().to_string(), "2025-06-01");
    assert_eq!(report.window.end().to_string(), "2025-06-30");
    assert_eq!(report.rows.len(), 30);
    assert_eq!(report.predicted_units.len(), 30);

    let rows = report.comparison.rows();
    assert_eq!(rows.len(), 2);

    // History inside the lookback shows up as actuals with no prediction
    assert_eq!(rows[0].product_name, "A");
    assert_eq!(rows[0].month, MonthKey::new(2025, 5).unwrap());
    assert_eq!(rows[0].predicted_sales, 0);
    assert_eq!(rows[0].actual_sales, total_actual);

    assert_eq!(rows[1].month, MonthKey::new(2025, 6).unwrap());
    assert_eq!(rows[1].actual_sales, 0.0);
    assert_eq!(
        rows[1].predicted_sales,
        report.predicted_units.iter().sum::<u64>()
    );
    assert!(rows[1].predicted_sales > 0);
}

#[test]
fn test_two_products_one_month() {
    let pipeline = ForecastPipeline::new(config(ForecastHorizon::OneMonth, 7)).unwrap();
    let report = pipeline.run(two_product_data()).unwrap();

    let june = MonthKey::new(2025, 6).unwrap();
    let predicted: Vec<&str> = report
        .comparison
        .rows()
        .iter()
        .filter(|r| r.month == june)
        .map(|r| r.product_name.as_str())
        .collect();
    assert_eq!(predicted, vec!["Bread", "Milk"]);
    assert_eq!(report.comparison.products(), vec!["Bread", "Milk"]);
    assert!(report.skipped_products.is_empty());
}

#[rstest]
#[case(ForecastHorizon::OneMonth, 1)]
#[case(ForecastHorizon::ThreeMonths, 3)]
#[case(ForecastHorizon::SixMonths, 6)]
fn test_predicted_months_follow_horizon(#[case] horizon: ForecastHorizon, #[case] months: usize) {
    let pipeline = ForecastPipeline::new(config(horizon, 11)).unwrap();
    let report = pipeline.run(two_product_data()).unwrap();

    assert_eq!(report.window.months().len(), months);
    for product in ["Milk", "Bread"] {
        let predicted_months = report
            .comparison
            .for_product(product)
            .filter(|r| r.month > MonthKey::new(2025, 5).unwrap())
            .count();
        assert_eq!(predicted_months, months);
    }
}

#[test]
fn test_fixed_seed_is_reproducible() {
    let pipeline = ForecastPipeline::new(config(ForecastHorizon::ThreeMonths, 42)).unwrap();

    let first = pipeline.run(two_product_data()).unwrap();
    let second = pipeline.run(two_product_data()).unwrap();

    assert_eq!(first.rows, second.rows);
    assert_eq!(first.predicted_units, second.predicted_units);
    assert_eq!(first.comparison, second.comparison);
}

#[test]
fn test_comparison_has_no_gaps() {
    let pipeline = ForecastPipeline::new(config(ForecastHorizon::SixMonths, 3)).unwrap();
    let report = pipeline.run(two_product_data()).unwrap();

    for row in report.comparison.rows() {
        assert!(row.actual_sales.is_finite());
        assert!(row.actual_sales >= 0.0);
    }
    // Keys are unique and sorted by product then month
    let keys: Vec<(String, MonthKey)> = report
        .comparison
        .rows()
        .iter()
        .map(|r| (r.product_name.clone(), r.month))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    sorted.dedup();
    assert_eq!(keys, sorted);
}

#[test]
fn test_outputs_written_to_disk() {
    let dir = tempdir().unwrap();
    let pipeline = ForecastPipeline::new(config(ForecastHorizon::OneMonth, 5)).unwrap();
    let report = pipeline.run(two_product_data()).unwrap();

    let csv_path = dir.path().join("out").join("monthly_sales_forecast.csv");
    save_csv(&report.comparison, &csv_path).unwrap();
    let chart_path = save_chart(&report.comparison, &dir.path().join("charts"), "monthly_forecast.html").unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Product_Name,Month,Predicted_Sales,Actual_Sales")
    );
    assert_eq!(lines.count(), report.comparison.len());

    let html = std::fs::read_to_string(chart_path).unwrap();
    assert!(html.contains("Forecast vs Actual Sales (Monthly)"));
}

#[test]
fn test_training_fit_is_reported() {
    let pipeline = ForecastPipeline::new(config(ForecastHorizon::OneMonth, 1)).unwrap();
    let context = pipeline.fit(two_product_data()).unwrap();

    assert_eq!(context.training_fit().samples, 40);
    assert!(context.training_fit().rmse.is_finite());
    assert_eq!(context.encoders().product.classes(), ["Bread", "Milk"]);
}

#[test]
fn test_skipped_product_keeps_actual_sales() {
    let mut csv = String::from(HEADER);
    csv.push('\n');
    for day in 1..=10 {
        csv.push_str(&format!("2025-05-{:02},Milk,Dairy,50.0,0,60,12\n", day));
    }
    csv.push_str("2025-05-03,Sample,Promo,20.0,0,30,4\n");
    csv.push_str("2025-05-08,Sample,Promo,0.0,100,30,7\n");
    let data = DataLoader::from_bytes(csv.into_bytes()).unwrap();

    let skip_config = ForecastConfig {
        sampling: SamplingConfig {
            price_policy: PricePolicy::SkipProduct,
            ..SamplingConfig::default()
        },
        ..config(ForecastHorizon::OneMonth, 8)
    };
    let report = ForecastPipeline::new(skip_config).unwrap().run(data).unwrap();

    assert_eq!(report.skipped_products, vec!["Sample".to_string()]);
    assert!(report.rows.iter().all(|r| r.product_name == "Milk"));

    let sample: Vec<_> = report.comparison.for_product("Sample").collect();
    assert_eq!(sample.len(), 1);
    assert_eq!(sample[0].month, MonthKey::new(2025, 5).unwrap());
    assert_eq!(sample[0].predicted_sales, 0);
    assert_eq!(sample[0].actual_sales, 11.0);

    let june = MonthKey::new(2025, 6).unwrap();
    let june_products: Vec<&str> = report
        .comparison
        .rows()
        .iter()
        .filter(|r| r.month == june)
        .map(|r| r.product_name.as_str())
        .collect();
    assert_eq!(june_products, vec!["Milk"]);
}
