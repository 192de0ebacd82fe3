//! In-memory frame: ordered named columns plus an integer row index.

use crate::error::{EvalError, EvalResult};
use crate::frame::column::Column;
use crate::frame::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A table of named columns with equal row counts.
///
/// Row selection always produces a fresh, independent frame; the source is
/// never aliased by a result.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataFrame {
    index: Vec<i64>,
    names: Vec<String>,
    columns: Vec<Column>,
}

impl DataFrame {
    /// Build a frame from `(name, column)` pairs. All columns must have the
    /// same length and names must be unique.
    pub fn from_columns<N, I>(columns: I) -> EvalResult<Self>
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Column)>,
    {
        let mut names: Vec<String> = Vec::new();
        let mut cols: Vec<Column> = Vec::new();
        for (name, col) in columns {
            let name = name.into();
            if names.iter().any(|n| *n == name) {
                return Err(EvalError::DuplicateColumn { name });
            }
            if let Some(first) = cols.first() {
                if col.len() != first.len() {
                    return Err(EvalError::LengthMismatch {
                        expected: first.len(),
                        actual: col.len(),
                    });
                }
            }
            names.push(name);
            cols.push(col);
        }
        let rows = cols.first().map(Column::len).unwrap_or(0);
        Ok(Self {
            index: (0..rows as i64).collect(),
            names,
            columns: cols,
        })
    }

    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Project a named column.
    pub fn column(&self, name: &str) -> EvalResult<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| &self.columns[i])
            .ok_or_else(|| EvalError::UnknownColumn {
                name: name.to_string(),
            })
    }

    /// The row index as a column of ints.
    pub fn index(&self) -> Column {
        self.index.iter().copied().collect()
    }

    /// Keep the rows where `mask` is true, as a fresh frame. The surviving
    /// rows keep their original index labels.
    pub fn filter_rows(&self, mask: &[bool]) -> EvalResult<DataFrame> {
        if mask.len() != self.num_rows() {
            return Err(EvalError::LengthMismatch {
                expected: self.num_rows(),
                actual: mask.len(),
            });
        }
        let index = self
            .index
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(i, _)| *i)
            .collect();
        let columns = self
            .columns
            .iter()
            .map(|col| {
                col.iter()
                    .zip(mask)
                    .filter(|(_, keep)| **keep)
                    .map(|(v, _)| v.clone())
                    .collect()
            })
            .collect();
        Ok(DataFrame {
            index,
            names: self.names.clone(),
            columns,
        })
    }

    /// Borrowing view of one row.
    pub fn row(&self, row: usize) -> Row<'_> {
        Row { df: self, row }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.num_rows()).map(move |row| Row { df: self, row })
    }

    /// Normalize column names: trim, lowercase, spaces to underscores.
    pub fn standardize_names(&self) -> DataFrame {
        let names = self
            .names
            .iter()
            .map(|n| n.trim().to_lowercase().replace(' ', "_"))
            .collect();
        DataFrame {
            index: self.index.clone(),
            names,
            columns: self.columns.clone(),
        }
    }
}

/// A borrowed view of one frame row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    df: &'a DataFrame,
    row: usize,
}

impl<'a> Row<'a> {
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.df
            .names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.df.columns[i].get(self.row))
    }

    pub fn index(&self) -> i64 {
        self.df.index[self.row]
    }

    pub fn values(&self) -> impl Iterator<Item = &'a Value> {
        let row = self.row;
        self.df.columns.iter().filter_map(move |c| c.get(row))
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut widths: Vec<usize> = self.names.iter().map(|n| n.len()).collect();
        let rendered: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|col| col.iter().map(|v| v.to_string()).collect())
            .collect();
        for (ci, cells) in rendered.iter().enumerate() {
            for cell in cells {
                widths[ci] = widths[ci].max(cell.len());
            }
        }
        let idx_width = self
            .index
            .iter()
            .map(|i| i.to_string().len())
            .max()
            .unwrap_or(0);

        write!(f, "{:>width$}", "", width = idx_width)?;
        for (name, w) in self.names.iter().zip(&widths) {
            write!(f, "  {:>width$}", name, width = w)?;
        }
        writeln!(f)?;
        for (ri, idx) in self.index.iter().enumerate() {
            write!(f, "{:>width$}", idx, width = idx_width)?;
            for (cells, w) in rendered.iter().zip(&widths) {
                write!(f, "  {:>width$}", cells[ri], width = w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
