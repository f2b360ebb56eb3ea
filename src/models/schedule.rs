use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::grid::PolicyConfig;

/// Roster parsed from an uploaded spreadsheet by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedSchedule {
    pub staff_ids: Vec<String>,
    #[serde(deserialize_with = "day_labels")]
    pub dates: Vec<String>,
    pub schedule: Vec<Vec<String>>,
}

/// Body of a generate call. `schedule` is the fixed input the scheduler must
/// keep; it fills the blanks around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub staff_ids: Vec<String>,
    #[serde(deserialize_with = "day_labels")]
    pub dates: Vec<String>,
    pub schedule: Vec<Vec<String>>,
    pub settings: PolicyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSchedule {
    pub schedule: Vec<Vec<String>>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadRequest {
    pub staff_ids: Vec<String>,
    #[serde(deserialize_with = "day_labels")]
    pub dates: Vec<String>,
    pub schedule: Vec<Vec<String>>,
}

/// Error body returned by the scheduler on non-success responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    pub detail: Value,
}

impl ErrorDetail {
    /// The scheduler sends either a plain message or a list of validation
    /// entries with a `msg` field.
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(entries) => {
                let messages: Vec<&str> = entries
                    .iter()
                    .filter_map(|entry| entry.get("msg").and_then(Value::as_str))
                    .collect();
                (!messages.is_empty()).then(|| messages.join("; "))
            }
            _ => None,
        }
    }
}

/// Day labels arrive as numbers from spreadsheets and as strings from
/// browsers; both are normalised to strings.
pub fn day_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<Value>::deserialize(deserializer)?;
    Ok(raw.into_iter().map(day_label).collect())
}

fn day_label(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        Value::Number(number) => match number.as_f64() {
            Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => number.to_string(),
        },
        other => other.to_string(),
    }
}
