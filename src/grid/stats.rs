use serde::Serialize;

use super::matrix::MatrixView;
use super::shift::ShiftCode;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowSummary {
    pub night_count: u32,
    pub day_count: u32,
    pub off_count: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnSummary {
    pub day_total: u32,
    pub night_total: u32,
    pub has_day_leader: bool,
}

/// Count night, day and off cells across one staff row.
pub fn summarize_row<'a>(cells: impl IntoIterator<Item = &'a str>) -> RowSummary {
    cells
        .into_iter()
        .filter_map(ShiftCode::from_cell)
        .fold(RowSummary::default(), |mut summary, code| {
            match code {
                ShiftCode::Night => summary.night_count += 1,
                ShiftCode::Day => summary.day_count += 1,
                _ if code.counts_as_off() => summary.off_count += 1,
                _ => {}
            }
            summary
        })
}

/// Count day and night coverage for one date across all staff.
///
/// The first `day_leader_count` rows are the day leaders; the column has a
/// leader when one of them is on a day shift or committee duty.
pub fn summarize_column(
    matrix: MatrixView<'_>,
    date: usize,
    day_leader_count: i64,
) -> ColumnSummary {
    matrix
        .column(date)
        .enumerate()
        .filter_map(|(staff, cell)| ShiftCode::from_cell(cell).map(|code| (staff, code)))
        .fold(ColumnSummary::default(), |mut summary, (staff, code)| {
            match code {
                ShiftCode::Day => summary.day_total += 1,
                ShiftCode::Night => summary.night_total += 1,
                _ => {}
            }
            if code.covers_day_leadership() && (staff as i64) < day_leader_count {
                summary.has_day_leader = true;
            }
            summary
        })
}
