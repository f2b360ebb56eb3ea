use serde::{Deserialize, Serialize};

use super::GridError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Danger,
}

/// What a badged count measures, which decides how it is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Nights worked against the per-staff cap.
    NightShiftLoad,
    /// Days off against the per-staff target, judged in both directions.
    OffDayBalance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub value: i64,
    pub severity: Severity,
}

impl MetricKind {
    pub fn classify(self, value: i64, target: i64) -> Severity {
        match self {
            MetricKind::NightShiftLoad => {
                if target <= 0 {
                    Severity::Ok
                } else if value >= target {
                    Severity::Danger
                } else if value >= target - 1 {
                    Severity::Warning
                } else {
                    Severity::Ok
                }
            }
            MetricKind::OffDayBalance => match value.abs_diff(target) {
                0 => Severity::Ok,
                1 => Severity::Warning,
                _ => Severity::Danger,
            },
        }
    }

    pub fn badge(self, value: i64, target: i64) -> Badge {
        Badge {
            value,
            severity: self.classify(value, target),
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricKind::NightShiftLoad => write!(f, "night-shift-load"),
            MetricKind::OffDayBalance => write!(f, "off-day-balance"),
        }
    }
}

impl std::str::FromStr for MetricKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "night" | "night-shift-load" => Ok(MetricKind::NightShiftLoad),
            "off" | "off-day-balance" => Ok(MetricKind::OffDayBalance),
            _ => Err(GridError::UnknownMetric(s.to_string())),
        }
    }
}

/// Classify a count given a metric kind in its textual form.
pub fn classify_badge(kind: &str, value: i64, target: i64) -> Result<Badge, GridError> {
    Ok(kind.parse::<MetricKind>()?.badge(value, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_night_load_thresholds() {
        for target in 1..=10 {
            for value in 0..=15 {
                let expected = if value >= target {
                    Severity::Danger
                } else if value == target - 1 {
                    Severity::Warning
                } else {
                    Severity::Ok
                };
                assert_eq!(
                    MetricKind::NightShiftLoad.classify(value, target),
                    expected,
                    "value={} target={}",
                    value,
                    target
                );
            }
        }
    }

    #[test]
    fn test_night_load_with_non_positive_cap_is_ok() {
        for value in 0..20 {
            assert_eq!(MetricKind::NightShiftLoad.classify(value, 0), Severity::Ok);
            assert_eq!(MetricKind::NightShiftLoad.classify(value, -3), Severity::Ok);
        }
    }

    #[test]
    fn test_off_balance_is_symmetric() {
        for target in 0..=12 {
            for distance in 0..=6 {
                let expected = match distance {
                    0 => Severity::Ok,
                    1 => Severity::Warning,
                    _ => Severity::Danger,
                };
                for value in [target - distance, target + distance] {
                    assert_eq!(
                        MetricKind::OffDayBalance.classify(value, target),
                        expected,
                        "value={} target={}",
                        value,
                        target
                    );
                }
            }
        }
    }

    #[test]
    fn test_unknown_kind_is_an_error() {
        let err = classify_badge("day", 3, 4).unwrap_err();
        assert!(matches!(err, GridError::UnknownMetric(ref kind) if kind == "day"));
    }

    #[test]
    fn test_textual_kinds() {
        assert_eq!(
            classify_badge("night", 4, 4).unwrap(),
            Badge {
                value: 4,
                severity: Severity::Danger,
            }
        );
        assert_eq!(
            classify_badge("off-day-balance", 8, 8).unwrap().severity,
            Severity::Ok
        );
    }
}
