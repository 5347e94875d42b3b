use sales_forecast::data::DataLoader;
use sales_forecast::ForecastError;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str =
    "Date,Product_Name,Product_Category,Price_per_Unit,Discount_%,Stock_Available,Units_Sold";

fn write_csv(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    file
}

#[test]
fn test_data_loader_from_csv() {
    let file = write_csv(&[
        HEADER,
        "2025-05-01,Milk,Dairy,45.0,10,60,12",
        "2025-05-01,Bread,Bakery,30.0,0,40,8",
        "2025-05-02,Milk,Dairy,50.0,0,55,9",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.len(), 3);
    assert!(!data.is_empty());
    assert_eq!(data.products(), vec!["Milk", "Bread"]);
    assert_eq!(data.latest_date().to_string(), "2025-05-02");

    let first = &data.records()[0];
    assert_eq!(first.product_category, "Dairy");
    assert_eq!(first.price_per_unit, 45.0);
    assert_eq!(first.discount_pct, 10.0);
    assert_eq!(first.stock_available, 60.0);
    assert_eq!(first.units_sold, 12.0);
    assert!(first.calendar.is_none());
}

#[test]
fn test_calendar_columns_are_read_when_present() {
    let file = write_csv(&[
        "Date,Product_Name,Product_Category,Price_per_Unit,Discount_%,Stock_Available,Units_Sold,DayOfWeek,Is_Weekend,Is_Holiday",
        "2025-05-01,Milk,Dairy,45.0,10,60,12,3,0,1",
        "2025-05-03,Milk,Dairy,45.0,10,60,15,5,1,0",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    let first = data.records()[0].calendar.unwrap();
    assert_eq!(first.day_of_week, 3);
    assert!(!first.is_weekend);
    assert!(first.is_holiday);
    assert!(data.records()[1].calendar.unwrap().is_weekend);
}

#[test]
fn test_from_bytes_matches_file() {
    let csv = format!("{}\n2025-05-01,Milk,Dairy,45.0,10,60,12\n", HEADER);
    let data = DataLoader::from_bytes(csv.into_bytes()).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data.records()[0].product_name, "Milk");
}

#[test]
fn test_load_falls_back_to_default() {
    let default = write_csv(&[HEADER, "2025-05-01,Milk,Dairy,45.0,10,60,12"]);
    let upload = write_csv(&[
        HEADER,
        "2025-05-01,Tea,Beverages,20.0,0,60,3",
        "2025-05-02,Tea,Beverages,20.0,0,60,4",
    ]);

    let fallback = DataLoader::load(None, default.path()).unwrap();
    assert_eq!(fallback.len(), 1);

    let uploaded = DataLoader::load(Some(upload.path()), default.path()).unwrap();
    assert_eq!(uploaded.products(), vec!["Tea"]);
}

#[test]
fn test_names_are_kept_verbatim() {
    let file = write_csv(&[
        HEADER,
        "2025-05-01,Milk,Dairy,45.0,10,60,12",
        "2025-05-02,\" Milk\",Dairy,45.0,10,60,9",
        "  2025-05-03 ,Milk,Dairy,45.0,10,60,7",
    ]);

    let data = DataLoader::from_csv(file.path()).unwrap();

    assert_eq!(data.products(), vec!["Milk", " Milk"]);
    assert_eq!(data.latest_date().to_string(), "2025-05-03");
}

#[test]
fn test_missing_column() {
    let file = write_csv(&[
        "Date,Product_Name,Product_Category,Price_per_Unit,Discount_%,Stock_Available",
        "2025-05-01,Milk,Dairy,45.0,10,60",
    ]);

    match DataLoader::from_csv(file.path()) {
        Err(ForecastError::MissingColumn(name)) => assert_eq!(name, "Units_Sold"),
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}

#[test]
fn test_unparseable_date() {
    let file = write_csv(&[HEADER, "yesterday,Milk,Dairy,45.0,10,60,12"]);
    assert!(matches!(
        DataLoader::from_csv(file.path()),
        Err(ForecastError::ParseError(_))
    ));
}

#[test]
fn test_data_loader_error_handling() {
    // Test with non-existent file
    let result = DataLoader::from_csv("nonexistent_file.csv");
    assert!(matches!(result, Err(ForecastError::IoError(_))));

    // Header only
    let file = write_csv(&[HEADER]);
    assert!(DataLoader::from_csv(file.path()).is_err());

    // Non-numeric price
    let file = write_csv(&[HEADER, "2025-05-01,Milk,Dairy,cheap,10,60,12"]);
    assert!(DataLoader::from_csv(file.path()).is_err());
}
