use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};
use serde::{Deserialize, Serialize};

/// Month the roster covers. `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekend {
    #[default]
    None,
    Saturday,
    Sunday,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Resolve a day-of-month against this month. Days outside the month
    /// roll over into the neighbouring months instead of being rejected.
    pub fn resolve_day(&self, day: i64) -> Option<NaiveDate> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        first.checked_add_signed(TimeDelta::try_days(day.checked_sub(1)?)?)
    }
}

/// Accepts the `YYYY-MM` form produced by month pickers.
impl std::str::FromStr for YearMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| format!("Invalid year-month: {}", s))?;

        let year = year
            .parse()
            .map_err(|_| format!("Invalid year-month: {}", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("Invalid year-month: {}", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("Month must be between 1 and 12, got {}", month));
        }

        Ok(YearMonth { year, month })
    }
}

/// Classify a header day label. Never fails: anything that cannot be placed
/// on the calendar is treated as a weekday.
pub fn classify_day(label: &str, selection: Option<YearMonth>) -> Weekend {
    let Some(selection) = selection else {
        return Weekend::None;
    };
    let Ok(day) = label.trim().parse::<i64>() else {
        return Weekend::None;
    };

    match selection.resolve_day(day).map(|date| date.weekday()) {
        Some(Weekday::Sat) => Weekend::Saturday,
        Some(Weekday::Sun) => Weekend::Sunday,
        _ => Weekend::None,
    }
}
