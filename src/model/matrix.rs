//! Rectangular integer grid carried by every hop.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Element type of every grid.
pub type Cell = i64;

/// A rows x cols grid of integers.
///
/// `rows` and `cols` travel explicitly next to `data`, so a grid received from
/// the wire may disagree with its own declared shape. Use [`Matrix::is_well_formed`]
/// before trusting it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<Cell>>,
}

impl Matrix {
    /// Creates a zero-filled rows x cols grid.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![vec![0; cols]; rows],
        }
    }

    /// Builds a grid from row vectors, taking the column count from the first row.
    pub fn from_rows(data: Vec<Vec<Cell>>) -> Self {
        let rows = data.len();
        let cols = data.first().map(Vec::len).unwrap_or(0);
        Self { rows, cols, data }
    }

    /// Returns (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True when both dimensions are zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 && self.cols == 0
    }

    /// Checks that `data` holds exactly `rows` rows of `cols` elements each.
    /// A grid without rows has nothing to carry a column count, so it must be 0x0.
    pub fn is_well_formed(&self) -> bool {
        if self.rows == 0 {
            return self.cols == 0 && self.data.is_empty();
        }
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.data {
            let cells: Vec<String> = row.iter().map(Cell::to_string).collect();
            writeln!(f, "[{}]", cells.join(" "))?;
        }
        Ok(())
    }
}
