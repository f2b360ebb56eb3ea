use serde::{Deserialize, Serialize};

/// One cell of the ward roster. Empty cells are represented by the absence of
/// a code, not by a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftCode {
    #[serde(rename = "日")]
    Day,
    #[serde(rename = "夜")]
    Night,
    #[serde(rename = "明")]
    PostNight,
    #[serde(rename = "公")]
    PublicHoliday,
    #[serde(rename = "希")]
    RequestedOff,
    #[serde(rename = "委")]
    Committee,
    #[serde(rename = "休")]
    Rest,
    #[serde(rename = "有")]
    PaidLeave,
    #[serde(rename = "研")]
    Training,
}

/// Background/foreground colours used when the grid is rendered or exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Palette {
    pub background: &'static str,
    pub foreground: &'static str,
    pub bold: bool,
}

impl ShiftCode {
    pub const ALL: [ShiftCode; 9] = [
        ShiftCode::Day,
        ShiftCode::Night,
        ShiftCode::PostNight,
        ShiftCode::PublicHoliday,
        ShiftCode::RequestedOff,
        ShiftCode::Committee,
        ShiftCode::Rest,
        ShiftCode::PaidLeave,
        ShiftCode::Training,
    ];

    /// Parse a raw cell. Surrounding whitespace is ignored; anything outside
    /// the vocabulary (including the empty string) yields `None`.
    pub fn from_cell(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }

    pub fn code(self) -> &'static str {
        match self {
            ShiftCode::Day => "日",
            ShiftCode::Night => "夜",
            ShiftCode::PostNight => "明",
            ShiftCode::PublicHoliday => "公",
            ShiftCode::RequestedOff => "希",
            ShiftCode::Committee => "委",
            ShiftCode::Rest => "休",
            ShiftCode::PaidLeave => "有",
            ShiftCode::Training => "研",
        }
    }

    /// Class name used by the front end to style a cell.
    pub fn css_class(self) -> &'static str {
        match self {
            ShiftCode::Day => "shift-day",
            ShiftCode::Night => "shift-night",
            ShiftCode::PostNight => "shift-post-night",
            ShiftCode::PublicHoliday => "shift-holiday",
            ShiftCode::RequestedOff => "shift-requested-off",
            ShiftCode::Committee => "shift-committee",
            ShiftCode::Rest | ShiftCode::PaidLeave | ShiftCode::Training => "shift-other-off",
        }
    }

    /// Off-day grouping table. Post-night rest, committee duty and training
    /// are never counted towards a staff member's days off.
    pub fn counts_as_off(self) -> bool {
        matches!(
            self,
            ShiftCode::PublicHoliday
                | ShiftCode::RequestedOff
                | ShiftCode::Rest
                | ShiftCode::PaidLeave
        )
    }

    /// Codes that put a day leader on the ward for the day.
    pub fn covers_day_leadership(self) -> bool {
        matches!(self, ShiftCode::Day | ShiftCode::Committee)
    }

    pub fn palette(self) -> Palette {
        let (background, foreground) = match self {
            ShiftCode::Day => ("FFFFFF", "333333"),
            ShiftCode::Night => ("1E3A5F", "FFFFFF"),
            ShiftCode::PostNight => ("BBDEFB", "333333"),
            ShiftCode::PublicHoliday => ("C8E6C9", "333333"),
            ShiftCode::RequestedOff => ("FFF9C4", "333333"),
            ShiftCode::Committee => ("FFE0B2", "333333"),
            ShiftCode::Rest | ShiftCode::PaidLeave => ("E0E0E0", "333333"),
            ShiftCode::Training => ("E1BEE7", "333333"),
        };

        Palette {
            background,
            foreground,
            bold: self == ShiftCode::Night,
        }
    }
}

impl std::fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for ShiftCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShiftCode::ALL
            .into_iter()
            .find(|code| code.code() == s)
            .ok_or_else(|| format!("Invalid shift code: {}", s))
    }
}
