//! JSON schema sent with the structured chart-data request.

use serde_json::{json, Value};

const CHART_KEYS: [&str; 3] = ["pieChart", "areaChart", "barChart"];

/// Overrides for the per-chart item bounds. `None` keeps the built-in bound.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChartSchemaOptions {
    pub min_items: Option<u32>,
    pub max_items: Option<u32>,
}

impl ChartSchemaOptions {
    pub fn with_min_items(mut self, min_items: u32) -> Self {
        self.min_items = Some(min_items);
        self
    }

    pub fn with_max_items(mut self, max_items: u32) -> Self {
        self.max_items = Some(max_items);
        self
    }
}

fn base_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "pieChart": {
                "type": "array",
                "description": "Market share distribution data using actual percentages from reliable sources. Values must sum to 100%.",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Company or segment name (e.g., 'Microsoft', 'Cloud Services', 'Others')"
                        },
                        "value": {
                            "type": "number",
                            "description": "Market share percentage (0-100)"
                        },
                        "unit": {
                            "type": "string",
                            "description": "Unit for the value (e.g., '%')"
                        }
                    },
                    "required": ["name", "value"]
                },
                "minItems": 3,
                "maxItems": 8
            },
            "areaChart": {
                "type": "array",
                "description": "Historical market size data using actual values, in chronological order",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Year in YYYY format"
                        },
                        "value": {
                            "type": "number",
                            "description": "Market size in billions USD"
                        },
                        "unit": {
                            "type": "string",
                            "description": "Unit for the value (e.g., 'B USD', 'M users')"
                        }
                    },
                    "required": ["name", "value"]
                },
                "minItems": 4,
                "maxItems": 10
            },
            "barChart": {
                "type": "array",
                "description": "Comparison of actual metrics (revenue, users, etc.) across companies or segments. Do not include project values.",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": {
                            "type": "string",
                            "description": "Metric and company/segment (e.g., 'Revenue - Microsoft', 'Users - Cloud Services')"
                        },
                        "value": {
                            "type": "number",
                            "description": "Primary metric value"
                        },
                        "unit": {
                            "type": "string",
                            "description": "Unit for the value (e.g., 'B USD', 'M users', '%')"
                        },
                        "secondaryValue": {
                            "type": "number",
                            "description": "Optional secondary metric value"
                        },
                        "secondaryUnit": {
                            "type": "string",
                            "description": "Unit for the secondary value"
                        }
                    },
                    "required": ["name", "value"]
                },
                "minItems": 3,
                "maxItems": 8
            }
        },
        "required": CHART_KEYS
    })
}

/// Fixed chart schema with `options` applied to a fresh copy.
pub fn chart_data_schema(options: &ChartSchemaOptions) -> Value {
    let mut schema = base_schema();
    let Some(properties) = schema.get_mut("properties").and_then(Value::as_object_mut) else {
        return schema;
    };

    for key in CHART_KEYS {
        let Some(chart) = properties.get_mut(key).and_then(Value::as_object_mut) else {
            continue;
        };
        if let Some(min_items) = options.min_items {
            chart.insert("minItems".to_string(), json!(min_items));
        }
        if let Some(max_items) = options.max_items {
            chart.insert("maxItems".to_string(), json!(max_items));
        }
    }

    schema
}
