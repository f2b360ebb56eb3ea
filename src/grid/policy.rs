use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_DAY_LEADER_COUNT: i64 = 5;
pub const DEFAULT_NIGHT_LEADER_COUNT: i64 = 3;
pub const DEFAULT_NIGHT_ELIGIBLE_COUNT: i64 = 15;
pub const DEFAULT_REQUIRED_STAFF_PER_DAY: i64 = 7;
pub const DEFAULT_MAX_NIGHT_SHIFTS: i64 = 4;
pub const DEFAULT_DAYS_OFF: i64 = 8;

/// Minimum night coverage per date. Fixed, never read from the policy.
pub const MIN_NIGHT_COVERAGE: u32 = 2;

/// Ward staffing thresholds. Field names double as the wire keys sent to the
/// scheduler as `settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    pub day_leader_count: i64,
    pub night_leader_count: i64,
    pub night_eligible_count: i64,
    pub required_staff_per_day: i64,
    pub max_night_shifts: i64,
    pub days_off: i64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            day_leader_count: DEFAULT_DAY_LEADER_COUNT,
            night_leader_count: DEFAULT_NIGHT_LEADER_COUNT,
            night_eligible_count: DEFAULT_NIGHT_ELIGIBLE_COUNT,
            required_staff_per_day: DEFAULT_REQUIRED_STAFF_PER_DAY,
            max_night_shifts: DEFAULT_MAX_NIGHT_SHIFTS,
            days_off: DEFAULT_DAYS_OFF,
        }
    }
}

impl PolicyConfig {
    /// Build a policy from loosely typed operator input. Every threshold is
    /// read independently; missing or non-numeric entries fall back to the
    /// default for that threshold.
    pub fn from_raw(raw: &HashMap<String, Value>) -> Self {
        let read = |key: &str, default: i64| {
            raw.get(key).and_then(lenient_int).unwrap_or_else(|| {
                if raw.contains_key(key) {
                    log::debug!("Ignoring non-numeric threshold {}, using {}", key, default);
                }
                default
            })
        };

        Self {
            day_leader_count: read("day_leader_count", DEFAULT_DAY_LEADER_COUNT),
            night_leader_count: read("night_leader_count", DEFAULT_NIGHT_LEADER_COUNT),
            night_eligible_count: read("night_eligible_count", DEFAULT_NIGHT_ELIGIBLE_COUNT),
            required_staff_per_day: read(
                "required_staff_per_day",
                DEFAULT_REQUIRED_STAFF_PER_DAY,
            ),
            max_night_shifts: read("max_night_shifts", DEFAULT_MAX_NIGHT_SHIFTS),
            days_off: read("days_off", DEFAULT_DAYS_OFF),
        }
    }
}

fn lenient_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<i64>().ok().or_else(|| {
                text.parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i64)
            })
        }
        _ => None,
    }
}
