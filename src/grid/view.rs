use serde::Serialize;

use super::GridError;
use super::badge::{Badge, MetricKind, Severity};
use super::calendar::{Weekend, YearMonth, classify_day};
use super::cell::classify_cell;
use super::matrix::{MatrixRole, MatrixView};
use super::policy::{MIN_NIGHT_COVERAGE, PolicyConfig};
use super::shift::{Palette, ShiftCode};
use super::stats::{RowSummary, summarize_column, summarize_row};

/// Everything needed to render one roster.
#[derive(Debug, Clone, Copy)]
pub struct GridInput<'a> {
    pub staff_ids: &'a [String],
    pub dates: &'a [String],
    pub schedule: &'a [Vec<String>],
    pub original: Option<&'a [Vec<String>]>,
    pub policy: &'a PolicyConfig,
    pub calendar: Option<YearMonth>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub policy: PolicyConfig,
    pub legend: Vec<LegendEntry>,
    pub header: Vec<DateHeader>,
    pub rows: Vec<StaffRow>,
    pub day_totals: Vec<TotalCell>,
    pub night_totals: Vec<TotalCell>,
    pub day_leader_present: Vec<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub code: ShiftCode,
    pub css_class: &'static str,
    pub palette: Palette,
    pub counts_as_off: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateHeader {
    pub label: String,
    pub weekend: Weekend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RowClass {
    Leader,
    Eligible,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaffRow {
    pub staff_id: String,
    pub row_class: Option<RowClass>,
    pub cells: Vec<CellView>,
    pub summary: RowSummary,
    pub night_badge: Badge,
    pub off_badge: Badge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub value: String,
    pub category: Option<ShiftCode>,
    pub css_class: Option<&'static str>,
    pub fixed: bool,
    pub weekend: Weekend,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TotalCell {
    pub value: u32,
    pub flagged: bool,
}

fn row_class(index: usize, policy: &PolicyConfig) -> Option<RowClass> {
    let index = index as i64;
    if index < policy.night_leader_count {
        Some(RowClass::Leader)
    } else if index < policy.night_eligible_count {
        Some(RowClass::Eligible)
    } else {
        None
    }
}

/// Assemble the render model for a roster. Pure: the same input always gives
/// the same view.
pub fn build_grid(input: GridInput<'_>) -> Result<GridView, GridError> {
    let staff_count = input.staff_ids.len();
    let date_count = input.dates.len();
    let policy = input.policy;

    let current = MatrixView::new(input.schedule, staff_count, date_count, MatrixRole::Current)?;
    let original = input
        .original
        .map(|rows| MatrixView::new(rows, staff_count, date_count, MatrixRole::Original))
        .transpose()?;

    let header: Vec<DateHeader> = input
        .dates
        .iter()
        .map(|label| DateHeader {
            label: label.clone(),
            weekend: classify_day(label, input.calendar),
        })
        .collect();

    let rows = input
        .staff_ids
        .iter()
        .enumerate()
        .map(|(staff, staff_id)| {
            let cells = current
                .row(staff)
                .zip(&header)
                .enumerate()
                .map(|(date, (value, head))| {
                    let class = classify_cell(value, original.map(|m| m.cell(staff, date)));
                    CellView {
                        value: value.to_string(),
                        category: class.category,
                        css_class: class.category.map(ShiftCode::css_class),
                        fixed: class.fixed,
                        weekend: head.weekend,
                    }
                })
                .collect();

            let summary = summarize_row(current.row(staff));

            StaffRow {
                staff_id: staff_id.clone(),
                row_class: row_class(staff, policy),
                cells,
                summary,
                night_badge: MetricKind::NightShiftLoad
                    .badge(summary.night_count.into(), policy.max_night_shifts),
                off_badge: MetricKind::OffDayBalance.badge(summary.off_count.into(), policy.days_off),
            }
        })
        .collect();

    let columns: Vec<_> = (0..date_count)
        .map(|date| summarize_column(current, date, policy.day_leader_count))
        .collect();

    let day_totals = columns
        .iter()
        .map(|column| TotalCell {
            value: column.day_total,
            flagged: i64::from(column.day_total) < policy.required_staff_per_day,
        })
        .collect();

    let night_totals = columns
        .iter()
        .map(|column| TotalCell {
            value: column.night_total,
            flagged: column.night_total < MIN_NIGHT_COVERAGE,
        })
        .collect();

    Ok(GridView {
        policy: *policy,
        legend: ShiftCode::ALL
            .into_iter()
            .map(|code| LegendEntry {
                code,
                css_class: code.css_class(),
                palette: code.palette(),
                counts_as_off: code.counts_as_off(),
            })
            .collect(),
        header,
        rows,
        day_totals,
        night_totals,
        day_leader_present: columns.iter().map(|column| column.has_day_leader).collect(),
    })
}

impl GridView {
    /// Human-readable compliance findings, per date first and then per staff.
    pub fn findings(&self) -> Vec<String> {
        let mut findings = Vec::new();

        for (index, head) in self.header.iter().enumerate() {
            let night = self.night_totals[index];
            if night.flagged {
                findings.push(format!(
                    "Day {}: {} on nights ({} required)",
                    head.label, night.value, MIN_NIGHT_COVERAGE
                ));
            }

            let day = self.day_totals[index];
            if day.flagged {
                findings.push(format!(
                    "Day {}: {} on days ({} required)",
                    head.label, day.value, self.policy.required_staff_per_day
                ));
            }

            if !self.day_leader_present[index] {
                findings.push(format!("Day {}: no day leader", head.label));
            }
        }

        for row in &self.rows {
            let nights = i64::from(row.summary.night_count);
            if nights > self.policy.max_night_shifts {
                findings.push(format!(
                    "Staff {}: {} night shifts (cap {})",
                    row.staff_id, nights, self.policy.max_night_shifts
                ));
            }

            // One day short of the target is tolerated.
            let off = i64::from(row.summary.off_count);
            if off < self.policy.days_off - 1 {
                findings.push(format!(
                    "Staff {}: {} days off (target {})",
                    row.staff_id, off, self.policy.days_off
                ));
            }
        }

        findings
    }

    /// Number of badges at the given severity across all staff rows.
    pub fn badge_count(&self, severity: Severity) -> usize {
        self.rows
            .iter()
            .flat_map(|row| [row.night_badge, row.off_badge])
            .filter(|badge| badge.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter().map(|row| strings(row)).collect()
    }

    fn scenario_policy() -> PolicyConfig {
        PolicyConfig {
            required_staff_per_day: 2,
            ..PolicyConfig::default()
        }
    }

    #[test]
    fn test_three_by_three_scenario() {
        let staff_ids = strings(&["001", "002", "003"]);
        let dates = strings(&["1", "2", "3"]);
        let schedule = rows(&[&["日", "夜", "公"], &["日", "", "休"], &["", "夜", "日"]]);
        let original = rows(&[&["日", "夜", "公"], &["", "", ""], &["", "", ""]]);
        let policy = scenario_policy();

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: Some(&original),
            policy: &policy,
            calendar: None,
        })
        .unwrap();

        let summaries: Vec<RowSummary> = view.rows.iter().map(|row| row.summary).collect();
        assert_eq!(
            summaries,
            vec![
                RowSummary {
                    night_count: 1,
                    day_count: 1,
                    off_count: 1
                },
                RowSummary {
                    night_count: 0,
                    day_count: 1,
                    off_count: 1
                },
                RowSummary {
                    night_count: 1,
                    day_count: 1,
                    off_count: 0
                },
            ]
        );

        assert_eq!(
            view.day_totals,
            vec![
                TotalCell {
                    value: 2,
                    flagged: false
                },
                TotalCell {
                    value: 0,
                    flagged: true
                },
                TotalCell {
                    value: 1,
                    flagged: true
                },
            ]
        );
        assert_eq!(
            view.night_totals,
            vec![
                TotalCell {
                    value: 0,
                    flagged: true
                },
                TotalCell {
                    value: 2,
                    flagged: false
                },
                TotalCell {
                    value: 0,
                    flagged: true
                },
            ]
        );

        assert!(view.rows[0].cells.iter().all(|cell| cell.fixed));
        assert!(view.rows[1..]
            .iter()
            .flat_map(|row| &row.cells)
            .all(|cell| !cell.fixed));
    }

    #[test]
    fn test_row_classes_follow_position() {
        let staff_ids = strings(&["a", "b", "c", "d"]);
        let dates = strings(&["1"]);
        let policy = PolicyConfig {
            night_leader_count: 1,
            night_eligible_count: 3,
            ..PolicyConfig::default()
        };

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &[],
            original: None,
            policy: &policy,
            calendar: None,
        })
        .unwrap();

        let classes: Vec<_> = view.rows.iter().map(|row| row.row_class).collect();
        assert_eq!(
            classes,
            vec![
                Some(RowClass::Leader),
                Some(RowClass::Eligible),
                Some(RowClass::Eligible),
                None
            ]
        );
    }

    #[test]
    fn test_badges_use_policy_targets() {
        let staff_ids = strings(&["001"]);
        let dates = strings(&["1", "2", "3", "4", "5"]);
        let schedule = rows(&[&["夜", "明", "夜", "明", "公"]]);
        let policy = PolicyConfig {
            max_night_shifts: 3,
            days_off: 3,
            ..PolicyConfig::default()
        };

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: None,
            policy: &policy,
            calendar: None,
        })
        .unwrap();

        let row = &view.rows[0];
        assert_eq!(
            row.night_badge,
            Badge {
                value: 2,
                severity: Severity::Warning
            }
        );
        assert_eq!(
            row.off_badge,
            Badge {
                value: 1,
                severity: Severity::Danger
            }
        );
        assert_eq!(view.badge_count(Severity::Danger), 1);
    }

    #[test]
    fn test_night_floor_ignores_max_night_policy() {
        let staff_ids = strings(&["001", "002"]);
        let dates = strings(&["1"]);
        let schedule = rows(&[&["夜"], &["夜"]]);

        for max_night_shifts in [0, 1, 10] {
            let policy = PolicyConfig {
                max_night_shifts,
                ..PolicyConfig::default()
            };
            let view = build_grid(GridInput {
                staff_ids: &staff_ids,
                dates: &dates,
                schedule: &schedule,
                original: None,
                policy: &policy,
                calendar: None,
            })
            .unwrap();

            assert!(!view.night_totals[0].flagged);
        }
    }

    #[test]
    fn test_weekend_marks_reach_cells() {
        let staff_ids = strings(&["001"]);
        let dates = strings(&["5", "6", "7"]);
        let schedule = rows(&[&["日", "公", "公"]]);
        let policy = PolicyConfig::default();

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: None,
            policy: &policy,
            calendar: Some(YearMonth::new(2024, 1)),
        })
        .unwrap();

        let weekends: Vec<_> = view.rows[0].cells.iter().map(|cell| cell.weekend).collect();
        assert_eq!(
            weekends,
            vec![Weekend::None, Weekend::Saturday, Weekend::Sunday]
        );
        assert_eq!(view.header[1].weekend, Weekend::Saturday);
    }

    #[test]
    fn test_ragged_original_is_rejected() {
        let staff_ids = strings(&["001"]);
        let dates = strings(&["1"]);
        let schedule = rows(&[&["日"]]);
        let original = rows(&[&["日", "夜"]]);
        let policy = PolicyConfig::default();

        let err = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: Some(&original),
            policy: &policy,
            calendar: None,
        })
        .unwrap_err();

        assert!(matches!(
            err,
            GridError::RaggedMatrix {
                role: MatrixRole::Original,
                ..
            }
        ));
    }

    #[test]
    fn test_findings() {
        let staff_ids = strings(&["001", "002"]);
        let dates = strings(&["1"]);
        let schedule = rows(&[&["夜"], &["日"]]);
        let policy = PolicyConfig {
            day_leader_count: 1,
            required_staff_per_day: 1,
            max_night_shifts: 4,
            days_off: 1,
            ..PolicyConfig::default()
        };

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: None,
            policy: &policy,
            calendar: None,
        })
        .unwrap();

        assert_eq!(
            view.findings(),
            vec![
                "Day 1: 1 on nights (2 required)".to_string(),
                "Day 1: no day leader".to_string(),
            ]
        );
    }

    #[test]
    fn test_zero_night_cap_still_reports_nights() {
        let staff_ids = strings(&["001"]);
        let dates = strings(&["1", "2"]);
        let schedule = rows(&[&["夜", "明"]]);
        let policy = PolicyConfig {
            max_night_shifts: 0,
            days_off: 0,
            ..PolicyConfig::default()
        };

        let view = build_grid(GridInput {
            staff_ids: &staff_ids,
            dates: &dates,
            schedule: &schedule,
            original: None,
            policy: &policy,
            calendar: None,
        })
        .unwrap();

        // The badge stays ok without a positive cap; the finding does not.
        assert_eq!(view.rows[0].night_badge.severity, Severity::Ok);
        assert!(
            view.findings()
                .contains(&"Staff 001: 1 night shifts (cap 0)".to_string())
        );
    }
}
