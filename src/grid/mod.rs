//! Roster statistics and presentation.
//!
//! Everything under this module is synchronous and side-effect free: a view is
//! recomputed from the two matrices, the policy and the calendar selection on
//! every render.

use thiserror::Error;

pub mod badge;
pub mod calendar;
pub mod cell;
pub mod matrix;
pub mod policy;
pub mod shift;
pub mod stats;
pub mod view;

pub use badge::{Badge, MetricKind, Severity, classify_badge};
pub use calendar::{Weekend, YearMonth, classify_day};
pub use cell::{CellClass, classify_cell};
pub use matrix::{MatrixRole, MatrixView};
pub use policy::{MIN_NIGHT_COVERAGE, PolicyConfig};
pub use shift::ShiftCode;
pub use stats::{ColumnSummary, RowSummary, summarize_column, summarize_row};
pub use view::{GridInput, GridView, build_grid};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("Ragged {role} matrix: {detail}")]
    RaggedMatrix { role: MatrixRole, detail: String },

    #[error("Unknown metric kind: {0}")]
    UnknownMetric(String),
}
