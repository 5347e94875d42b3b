//! Presentation of the monthly comparison: CSV export, table, charts

use crate::aggregate::{ComparisonRow, MonthlyComparison};
use crate::error::Result;
use serde_json::{json, Value};
use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

pub const CHART_TITLE: &str = "Forecast vs Actual Sales (Monthly)";

const ACTUAL_SERIES: &str = "Actual_Sales";
const PREDICTED_SERIES: &str = "Predicted_Sales";
const ACTUAL_COLOR: &str = "#636efa";
const PREDICTED_COLOR: &str = "#EF553B";
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// Write the comparison as CSV with a header row
pub fn write_csv<W: Write>(comparison: &MonthlyComparison, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if comparison.is_empty() {
        csv_writer.write_record(["Product_Name", "Month", "Predicted_Sales", "Actual_Sales"])?;
    }
    for row in comparison.rows() {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// CSV as a string, for downloads
pub fn to_csv_string(comparison: &MonthlyComparison) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(comparison, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| crate::error::ForecastError::DataError(e.to_string()))
}

/// Save the CSV, creating parent directories
pub fn save_csv(comparison: &MonthlyComparison, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    write_csv(comparison, File::create(path)?)?;
    info!(path = %path.display(), rows = comparison.len(), "wrote forecast csv");
    Ok(())
}

fn format_units(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

/// Fixed-width text table
pub fn render_table(comparison: &MonthlyComparison) -> String {
    let headers = ["Product_Name", "Month", PREDICTED_SERIES, ACTUAL_SERIES];
    let cells: Vec<[String; 4]> = comparison
        .rows()
        .iter()
        .map(|r| {
            [
                r.product_name.clone(),
                r.month.to_string(),
                r.predicted_sales.to_string(),
                format_units(r.actual_sales),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let line = |out: &mut String, values: [&str; 4]| {
        let _ = writeln!(
            out,
            "{:<w0$}  {:<w1$}  {:>w2$}  {:>w3$}",
            values[0],
            values[1],
            values[2],
            values[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        );
    };

    line(&mut out, headers);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&mut out, [rule[0].as_str(), rule[1].as_str(), rule[2].as_str(), rule[3].as_str()]);
    for row in &cells {
        line(&mut out, [row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]);
    }
    out
}

/// Grouped horizontal bars, one block per product
pub fn render_text_chart(comparison: &MonthlyComparison, bar_width: usize) -> String {
    let max = comparison
        .rows()
        .iter()
        .flat_map(|r| [r.predicted_sales as f64, r.actual_sales])
        .fold(0.0_f64, f64::max);
    let scale = |value: f64| -> usize {
        if max <= 0.0 {
            0
        } else {
            ((value / max) * bar_width as f64).round() as usize
        }
    };

    let mut out = String::new();
    let _ = writeln!(out, "{}", CHART_TITLE);
    for product in comparison.products() {
        let _ = writeln!(out, "\n[{}]", product);
        for row in comparison.for_product(product) {
            let _ = writeln!(
                out,
                "  {}  Actual    |{:<bw$}| {}",
                row.month,
                "#".repeat(scale(row.actual_sales)),
                format_units(row.actual_sales),
                bw = bar_width
            );
            let _ = writeln!(
                out,
                "  {}  Predicted |{:<bw$}| {}",
                " ".repeat(7),
                "=".repeat(scale(row.predicted_sales as f64)),
                row.predicted_sales,
                bw = bar_width
            );
        }
    }
    out
}

/// Plotly figure with one facet per product and grouped bars per month
pub fn plotly_figure(comparison: &MonthlyComparison) -> Value {
    let products = comparison.products();
    let count = products.len().max(1);
    let gap = 0.03;
    let facet_width = (1.0 - gap * (count as f64 - 1.0)) / count as f64;

    let mut traces = Vec::new();
    let mut annotations = Vec::new();
    let mut layout = serde_json::Map::new();

    for (i, product) in products.iter().enumerate() {
        let suffix = if i == 0 { String::new() } else { (i + 1).to_string() };
        let rows: Vec<&ComparisonRow> = comparison.for_product(product).collect();
        let months: Vec<String> = rows.iter().map(|r| r.month.to_string()).collect();

        let series = [
            (
                ACTUAL_SERIES,
                ACTUAL_COLOR,
                rows.iter().map(|r| json!(r.actual_sales)).collect::<Vec<_>>(),
            ),
            (
                PREDICTED_SERIES,
                PREDICTED_COLOR,
                rows.iter().map(|r| json!(r.predicted_sales)).collect::<Vec<_>>(),
            ),
        ];
        for (name, color, values) in series {
            traces.push(json!({
                "type": "bar",
                "name": name,
                "legendgroup": name,
                "showlegend": i == 0,
                "marker": { "color": color },
                "x": &months,
                "y": values,
                "xaxis": format!("x{}", suffix),
                "yaxis": format!("y{}", suffix),
            }));
        }

        let start = i as f64 * (facet_width + gap);
        let end = start + facet_width;
        layout.insert(
            format!("xaxis{}", suffix),
            json!({ "domain": [start, end], "anchor": format!("y{}", suffix), "title": { "text": "Month" }, "type": "category" }),
        );
        let mut yaxis = json!({ "anchor": format!("x{}", suffix) });
        if i == 0 {
            yaxis["title"] = json!({ "text": "Units Sold" });
        } else {
            yaxis["matches"] = json!("y");
        }
        layout.insert(format!("yaxis{}", suffix), yaxis);

        annotations.push(json!({
            "text": format!("Product_Name={}", product),
            "x": (start + end) / 2.0,
            "y": 1.0,
            "xref": "paper",
            "yref": "paper",
            "xanchor": "center",
            "yanchor": "bottom",
            "showarrow": false,
        }));
    }

    layout.insert("title".to_string(), json!({ "text": CHART_TITLE }));
    layout.insert("barmode".to_string(), json!("group"));
    layout.insert("height".to_string(), json!(600));
    layout.insert("legend".to_string(), json!({ "title": { "text": "Type" } }));
    layout.insert("annotations".to_string(), Value::Array(annotations));

    json!({ "data": traces, "layout": Value::Object(layout) })
}

/// Self-contained HTML page rendering the figure
pub fn render_html(comparison: &MonthlyComparison) -> Result<String> {
    let figure = serde_json::to_string(&plotly_figure(comparison))?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{cdn}"></script>
</head>
<body>
<div id="chart" style="width:100%;height:600px;"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout, {{responsive: true}});
</script>
</body>
</html>
"#,
        title = CHART_TITLE,
        cdn = PLOTLY_CDN,
        figure = figure
    ))
}

/// Write the chart page into `dir`, returning its path
pub fn save_chart(comparison: &MonthlyComparison, dir: &Path, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    fs::write(&path, render_html(comparison)?)?;
    info!(path = %path.display(), "wrote forecast chart");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::MonthlyTotals;
    use crate::calendar::MonthKey;

    fn comparison() -> MonthlyComparison {
        let mut predicted = MonthlyTotals::new();
        predicted.insert(("A".to_string(), MonthKey::new(2025, 6).unwrap()), 30);
        predicted.insert(("B".to_string(), MonthKey::new(2025, 6).unwrap()), 12);
        let mut actual = MonthlyTotals::new();
        actual.insert(("A".to_string(), MonthKey::new(2025, 5).unwrap()), 25.0);
        MonthlyComparison::merge(&predicted, &actual)
    }

    #[test]
    fn test_csv_layout() {
        let csv = to_csv_string(&comparison()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Product_Name,Month,Predicted_Sales,Actual_Sales");
        assert_eq!(lines[1], "A,2025-05,0,25");
        assert_eq!(lines[2], "A,2025-06,30,0");
        assert_eq!(lines[3], "B,2025-06,12,0");
    }

    #[test]
    fn test_empty_csv_has_header() {
        let csv = to_csv_string(&MonthlyComparison::default()).unwrap();
        assert_eq!(csv.trim(), "Product_Name,Month,Predicted_Sales,Actual_Sales");
    }

    #[test]
    fn test_figure_has_one_facet_per_product() {
        let figure = plotly_figure(&comparison());
        let traces = figure["data"].as_array().unwrap();
        assert_eq!(traces.len(), 4);
        assert_eq!(traces[2]["xaxis"], "x2");
        assert_eq!(figure["layout"]["barmode"], "group");
        assert_eq!(figure["layout"]["annotations"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_table_and_text_chart() {
        let table = render_table(&comparison());
        assert_eq!(table.lines().count(), 5);
        assert!(table.lines().next().unwrap().starts_with("Product_Name"));

        let chart = render_text_chart(&comparison(), 20);
        assert!(chart.contains("[A]"));
        assert!(chart.contains("[B]"));
        assert!(chart.contains(&"=".repeat(20)));
    }

    #[test]
    fn test_html_embeds_figure() {
        let html = render_html(&comparison()).unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("Predicted_Sales"));
    }
}
