//! Chart data normalization and the fixed fallback dataset.

use launchkit_core::output_parsers::strip_json_fence;
use serde_json::{Map, Value};

use crate::types::{BarPoint, ChartData, ChartPoint};

const PIE_DEFAULT_NAME: &str = "Other";
const SERIES_DEFAULT_NAME: &str = "Unknown";

/// Unit label implied by a bar-chart metric name, if any.
pub fn unit_for_metric(name: &str) -> Option<&'static str> {
    let name = name.to_lowercase();
    if name.contains("revenue") || name.contains("sales") {
        Some("$")
    } else if name.contains("share") || name.contains("growth") {
        Some("%")
    } else if name.contains("users") || name.contains("customers") {
        Some(" users")
    } else {
        None
    }
}

fn name_or(item: &Map<String, Value>, default: &str) -> String {
    match item.get("name") {
        Some(Value::String(name)) if !name.is_empty() => name.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => default.to_string(),
    }
}

fn number(item: &Map<String, Value>, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

fn text(item: &Map<String, Value>, key: &str) -> Option<String> {
    item.get(key)
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Non-empty array under `key`, with non-object entries read as empty objects.
fn items(raw: &Value, key: &str) -> Option<Vec<Map<String, Value>>> {
    let array = raw.get(key)?.as_array().filter(|array| !array.is_empty())?;
    Some(
        array
            .iter()
            .map(|item| item.as_object().cloned().unwrap_or_default())
            .collect(),
    )
}

fn series(raw: &Value, key: &str, default_name: &str) -> Option<Vec<ChartPoint>> {
    items(raw, key).map(|items| {
        items
            .iter()
            .map(|item| ChartPoint {
                name: name_or(item, default_name),
                value: number(item, "value").unwrap_or(0.0),
                unit: text(item, "unit"),
            })
            .collect()
    })
}

/// Maps any parsed value onto [`ChartData`]. Never fails; malformed values
/// become zero and missing names get a placeholder label.
pub fn sanitize_chart_data(raw: &Value) -> ChartData {
    let bar_chart = items(raw, "barChart").map(|items| {
        items
            .iter()
            .map(|item| {
                let name = name_or(item, SERIES_DEFAULT_NAME);
                let unit = unit_for_metric(&name)
                    .map(str::to_string)
                    .or_else(|| text(item, "unit"));
                BarPoint {
                    value: number(item, "value").unwrap_or(0.0),
                    unit,
                    secondary_value: number(item, "secondaryValue"),
                    secondary_unit: text(item, "secondaryUnit"),
                    name,
                }
            })
            .collect()
    });

    ChartData {
        pie_chart: series(raw, "pieChart", PIE_DEFAULT_NAME),
        area_chart: series(raw, "areaChart", SERIES_DEFAULT_NAME),
        bar_chart,
    }
}

/// Dataset shown whenever generated chart data is unusable.
pub fn fallback_chart_data() -> ChartData {
    let bar = |name: &str, value: f64, secondary: f64, unit: &str| BarPoint {
        name: name.to_string(),
        value,
        unit: Some(unit.to_string()),
        secondary_value: Some(secondary),
        secondary_unit: None,
    };

    ChartData {
        pie_chart: Some(vec![
            ChartPoint::new("Market Leader", 35.0).with_unit("%"),
            ChartPoint::new("Competitor A", 25.0).with_unit("%"),
            ChartPoint::new("Competitor B", 20.0).with_unit("%"),
            ChartPoint::new("Others", 20.0).with_unit("%"),
        ]),
        area_chart: Some(vec![
            ChartPoint::new("2019", 1_200_000.0).with_unit("$"),
            ChartPoint::new("2020", 1_100_000.0).with_unit("$"),
            ChartPoint::new("2021", 1_500_000.0).with_unit("$"),
            ChartPoint::new("2022", 2_200_000.0).with_unit("$"),
            ChartPoint::new("2023", 3_100_000.0).with_unit("$"),
        ]),
        bar_chart: Some(vec![
            bar("Revenue", 4_800_000.0, 3_000_000.0, "$"),
            bar("Market Share", 35.0, 25.0, "%"),
            bar("Growth Rate", 28.0, 15.0, "%"),
            bar("Customer Base", 520_000.0, 380_000.0, " users"),
        ]),
    }
}

/// Parses the structured chart response, falling back to
/// [`fallback_chart_data`] when it is not a usable chart object.
pub fn parse_chart_response(text: &str) -> ChartData {
    let raw = match serde_json::from_str::<Value>(strip_json_fence(text)) {
        Ok(raw) => raw,
        Err(err) => {
            tracing::warn!(error = %err, "chart data is not valid JSON, using fallback");
            return fallback_chart_data();
        }
    };

    if !raw.is_object() {
        tracing::warn!("chart data is not a JSON object, using fallback");
        return fallback_chart_data();
    }

    let charts = sanitize_chart_data(&raw);
    if charts.is_empty() {
        tracing::warn!("chart data contained no charts, using fallback");
        return fallback_chart_data();
    }
    charts
}
