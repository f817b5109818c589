use thiserror::Error;

use crate::analysis::AnalysisError;

// ---------------------------------------------------------------------------
// Dataset – a rectangular numeric table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("dataset has no columns")]
    NoColumns,
    #[error("{names} column names for {columns} columns")]
    NameCount { names: usize, columns: usize },
    #[error("column '{column}' has {got} rows, expected {expected}")]
    Ragged {
        column: String,
        expected: usize,
        got: usize,
    },
    #[error("row {row} has {got} cells, expected {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("column '{column}', row {row}: value is not a finite number")]
    NonFinite { column: String, row: usize },
}

/// The imported data table, stored column-major.
///
/// Rows are observations, columns are variables. The table is replaced
/// wholesale on every import and never edited in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Header names in file order.
    pub column_names: Vec<String>,
    /// `columns[c][r]` is row `r` of column `c`; all columns share one length.
    pub columns: Vec<Vec<f64>>,
}

impl Dataset {
    /// Validate shape and values, then build the table.
    pub fn new(column_names: Vec<String>, columns: Vec<Vec<f64>>) -> Result<Self, DatasetError> {
        if columns.is_empty() {
            return Err(DatasetError::NoColumns);
        }
        if column_names.len() != columns.len() {
            return Err(DatasetError::NameCount {
                names: column_names.len(),
                columns: columns.len(),
            });
        }
        let expected = columns[0].len();
        for (name, col) in column_names.iter().zip(&columns) {
            if col.len() != expected {
                return Err(DatasetError::Ragged {
                    column: name.clone(),
                    expected,
                    got: col.len(),
                });
            }
            if let Some(row) = col.iter().position(|v| !v.is_finite()) {
                return Err(DatasetError::NonFinite {
                    column: name.clone(),
                    row,
                });
            }
        }
        Ok(Dataset {
            column_names,
            columns,
        })
    }

    /// Build from row-major records (as read from CSV).
    pub fn from_rows(column_names: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, DatasetError> {
        let mut columns = vec![Vec::with_capacity(rows.len()); column_names.len()];
        for (r, row) in rows.iter().enumerate() {
            if row.len() != column_names.len() {
                return Err(DatasetError::RowWidth {
                    row: r,
                    expected: column_names.len(),
                    got: row.len(),
                });
            }
            for (c, &v) in row.iter().enumerate() {
                columns[c].push(v);
            }
        }
        Dataset::new(column_names, columns)
    }

    /// Number of observations.
    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn row(&self, r: usize) -> Option<Vec<f64>> {
        (r < self.n_rows()).then(|| self.columns.iter().map(|c| c[r]).collect())
    }

    /// The first two columns as `(x, y)`, the pair every two-variable plot
    /// and fit works on.
    pub fn xy(&self) -> Result<(&[f64], &[f64]), AnalysisError> {
        if self.n_columns() < 2 {
            return Err(AnalysisError::TooFewColumns {
                needed: 2,
                got: self.n_columns(),
            });
        }
        Ok((&self.columns[0], &self.columns[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: &[&str]) -> Vec<String> {
        n.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Dataset::new(names(&["a", "b"]), vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::Ragged {
                column: "b".into(),
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn nan_cells_are_rejected() {
        let err = Dataset::new(names(&["a"]), vec![vec![1.0, f64::NAN]]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::NonFinite {
                column: "a".into(),
                row: 1
            }
        );
    }

    #[test]
    fn from_rows_transposes() {
        let ds = Dataset::from_rows(names(&["x", "y"]), &[vec![1.0, 10.0], vec![2.0, 20.0]]).unwrap();
        assert_eq!(ds.columns, vec![vec![1.0, 2.0], vec![10.0, 20.0]]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.row(1), Some(vec![2.0, 20.0]));
        assert_eq!(ds.row(2), None);
    }

    #[test]
    fn short_rows_are_rejected() {
        let err = Dataset::from_rows(names(&["x", "y"]), &[vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert_eq!(
            err,
            DatasetError::RowWidth {
                row: 1,
                expected: 2,
                got: 1
            }
        );
    }

    #[test]
    fn xy_needs_two_columns() {
        let ds = Dataset::new(names(&["only"]), vec![vec![1.0]]).unwrap();
        assert_eq!(
            ds.xy(),
            Err(AnalysisError::TooFewColumns { needed: 2, got: 1 })
        );
    }
}
