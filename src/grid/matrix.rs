use super::GridError;

/// Which input a matrix came from, used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixRole {
    Current,
    Original,
}

impl std::fmt::Display for MatrixRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixRole::Current => write!(f, "current"),
            MatrixRole::Original => write!(f, "original"),
        }
    }
}

/// Borrowed staff × date view over a nested-array schedule.
///
/// Missing rows and short rows read as empty cells. Extra rows or extra
/// columns cannot be attributed to a staff member or a date and are rejected.
#[derive(Debug, Clone, Copy)]
pub struct MatrixView<'a> {
    rows: &'a [Vec<String>],
    staff_count: usize,
    date_count: usize,
}

impl<'a> MatrixView<'a> {
    pub fn new(
        rows: &'a [Vec<String>],
        staff_count: usize,
        date_count: usize,
        role: MatrixRole,
    ) -> Result<Self, GridError> {
        if rows.len() > staff_count {
            return Err(GridError::RaggedMatrix {
                role,
                detail: format!("{} rows for {} staff", rows.len(), staff_count),
            });
        }

        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() > date_count)
        {
            return Err(GridError::RaggedMatrix {
                role,
                detail: format!(
                    "row {} has {} cells for {} dates",
                    index,
                    row.len(),
                    date_count
                ),
            });
        }

        Ok(Self {
            rows,
            staff_count,
            date_count,
        })
    }

    pub fn staff_count(&self) -> usize {
        self.staff_count
    }

    pub fn date_count(&self) -> usize {
        self.date_count
    }

    pub fn cell(&self, staff: usize, date: usize) -> &'a str {
        self.rows
            .get(staff)
            .and_then(|row| row.get(date))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Every cell of one staff row, padded to the date count.
    pub fn row(self, staff: usize) -> impl Iterator<Item = &'a str> {
        (0..self.date_count).map(move |date| self.cell(staff, date))
    }

    /// Every cell of one date column, padded to the staff count.
    pub fn column(self, date: usize) -> impl Iterator<Item = &'a str> {
        (0..self.staff_count).map(move |staff| self.cell(staff, date))
    }
}
