use super::shift::ShiftCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellClass {
    pub category: Option<ShiftCode>,
    pub fixed: bool,
}

/// Classify one cell of the current roster.
///
/// `original` is `None` when no pre-generation roster was supplied at all,
/// and `Some("")` when one was supplied but the cell was blank. A cell is
/// fixed whenever the original held something, whatever the current value.
pub fn classify_cell(value: &str, original: Option<&str>) -> CellClass {
    CellClass {
        category: ShiftCode::from_cell(value),
        fixed: original.is_some_and(|cell| !cell.trim().is_empty()),
    }
}
