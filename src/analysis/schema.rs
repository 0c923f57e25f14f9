//! Declared response contracts.
//!
//! The same description is rendered into the request (so the model is
//! constrained to it) and used to validate the reply before it is parsed.

use serde_json::{Map, Value, json};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("reply is not a JSON object at `{0}`")]
    NotAnObject(String),
    #[error("required field `{0}` is missing")]
    MissingField(String),
    #[error("field `{path}` should be {expected}")]
    WrongType { path: String, expected: &'static str },
    #[error("field `{path}` has unexpected value {value:?}")]
    NotInEnum { path: String, value: String },
    #[error("field `{path}` = {value} is outside [{min}, {max}]")]
    OutOfRange {
        path: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

#[derive(Debug)]
pub enum FieldKind {
    String,
    Number { min: f64, max: f64 },
    Enum(&'static [&'static str]),
    StringArray,
    Object(&'static [FieldSpec]),
}

#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, kind: FieldKind, description: &'static str) -> Self {
        Self {
            name,
            kind,
            description,
        }
    }
}

/// A versioned object schema. Every declared field is required.
#[derive(Debug)]
pub struct ResponseSchema {
    pub name: &'static str,
    pub version: u32,
    pub fields: &'static [FieldSpec],
}

impl ResponseSchema {
    /// Gemini `responseSchema` JSON (OpenAPI subset, upper-case type names).
    pub fn to_json(&self) -> Value {
        object_json(self.fields)
    }

    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        validate_object(self.fields, value, "")
    }
}

fn object_json(fields: &[FieldSpec]) -> Value {
    let mut properties = Map::new();
    for field in fields {
        let mut spec = match &field.kind {
            FieldKind::String => json!({ "type": "STRING" }),
            FieldKind::Number { min, max } => {
                let mut number = json!({ "type": "NUMBER" });
                if min.is_finite() {
                    number["minimum"] = Value::from(*min);
                }
                if max.is_finite() {
                    number["maximum"] = Value::from(*max);
                }
                number
            }
            FieldKind::Enum(values) => json!({ "type": "STRING", "enum": values }),
            FieldKind::StringArray => json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
            FieldKind::Object(inner) => object_json(inner),
        };
        if !field.description.is_empty() {
            spec["description"] = Value::from(field.description);
        }
        properties.insert(field.name.to_string(), spec);
    }
    let required: Vec<&str> = fields.iter().map(|f| f.name).collect();
    json!({ "type": "OBJECT", "properties": properties, "required": required })
}

fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", parent, name)
    }
}

fn validate_object(fields: &[FieldSpec], value: &Value, path: &str) -> Result<(), SchemaViolation> {
    let Some(object) = value.as_object() else {
        return Err(SchemaViolation::NotAnObject(path.to_string()));
    };
    for field in fields {
        let path = join(path, field.name);
        let Some(v) = object.get(field.name).filter(|v| !v.is_null()) else {
            return Err(SchemaViolation::MissingField(path));
        };
        let wrong = |expected| SchemaViolation::WrongType {
            path: path.clone(),
            expected,
        };
        match &field.kind {
            FieldKind::String => {
                v.as_str().ok_or_else(|| wrong("a string"))?;
            }
            FieldKind::Number { min, max } => {
                let n = v.as_f64().ok_or_else(|| wrong("a number"))?;
                if n < *min || n > *max {
                    return Err(SchemaViolation::OutOfRange {
                        path,
                        value: n,
                        min: *min,
                        max: *max,
                    });
                }
            }
            FieldKind::Enum(allowed) => {
                let s = v.as_str().ok_or_else(|| wrong("a string"))?;
                if !allowed.contains(&s) {
                    return Err(SchemaViolation::NotInEnum {
                        path,
                        value: s.to_string(),
                    });
                }
            }
            FieldKind::StringArray => {
                let items = v.as_array().ok_or_else(|| wrong("an array of strings"))?;
                if !items.iter().all(Value::is_string) {
                    return Err(wrong("an array of strings"));
                }
            }
            FieldKind::Object(inner) => validate_object(inner, v, &path)?,
        }
    }
    Ok(())
}

const CONFIDENCE: FieldKind = FieldKind::Number {
    min: 0.0,
    max: 100.0,
};

pub const CHART_PATTERN: ResponseSchema = ResponseSchema {
    name: "chart_pattern",
    version: 1,
    fields: &[
        FieldSpec::new("patternName", FieldKind::String, "The primary chart pattern identified."),
        FieldSpec::new("confidence", CONFIDENCE, "Confidence score between 0 and 100."),
        FieldSpec::new("trend", FieldKind::Enum(&["Bullish", "Bearish", "Neutral"]), ""),
        FieldSpec::new(
            "supportLevels",
            FieldKind::StringArray,
            "List of price levels acting as support.",
        ),
        FieldSpec::new(
            "resistanceLevels",
            FieldKind::StringArray,
            "List of price levels acting as resistance.",
        ),
        FieldSpec::new("analysis", FieldKind::String, "Detailed technical analysis summary."),
        FieldSpec::new(
            "actionableAdvice",
            FieldKind::String,
            "Trading suggestion (e.g., Wait for breakout, Stop loss at X).",
        ),
    ],
};

pub const AGENT_DECISION: ResponseSchema = ResponseSchema {
    name: "agent_decision",
    version: 1,
    fields: &[
        FieldSpec::new("action", FieldKind::Enum(&["BUY", "SELL", "HOLD"]), ""),
        FieldSpec::new("confidence", CONFIDENCE, "Confidence in the action, 0 to 100."),
        FieldSpec::new(
            "rewardRiskRatio",
            FieldKind::Number {
                min: 0.0,
                max: f64::INFINITY,
            },
            "Expected reward divided by risk.",
        ),
        FieldSpec::new("suggestedEntry", FieldKind::String, "Entry price or zone."),
        FieldSpec::new("stopLoss", FieldKind::String, "Stop-loss price."),
        FieldSpec::new("takeProfit", FieldKind::String, "Take-profit price."),
        FieldSpec::new("reasoning", FieldKind::String, "Why this action was chosen."),
        FieldSpec::new(
            "detectedState",
            FieldKind::Object(&[
                FieldSpec::new("trend", FieldKind::String, ""),
                FieldSpec::new("volatility", FieldKind::String, ""),
                FieldSpec::new("keyLevels", FieldKind::String, ""),
            ]),
            "Market state observed in the chart.",
        ),
    ],
};
