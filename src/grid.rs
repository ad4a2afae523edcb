use crate::core::{Result, SimqlError};

/// Row Grid Module for SIMQL
///
/// This module provides the rectangular exchange container that carries table
/// data between the database side and the caller side. Every value is held as
/// an untyped string cell; column identity is purely positional and must be
/// validated by the caller, since the grid knows column counts, not names.

/// A two-dimensional, row-major, rectangular container of string cells.
///
/// The grid is backed by a single flat buffer of `rows * cols` cells, sized up
/// front. Every row has exactly `cols` cells; an empty grid (`rows == 0`) is
/// valid and represents "no matching data" or "nothing to write".
#[derive(Debug, Clone, PartialEq)]
pub struct RowGrid {
    rows: usize,
    cols: usize,
    cells: Vec<String>,
}

impl RowGrid {
    /// Creates a pre-sized grid of `rows x cols` empty cells.
    pub fn new(rows: usize, cols: usize) -> Self {
        RowGrid {
            rows,
            cols,
            cells: vec![String::new(); rows * cols],
        }
    }

    /// Builds a grid from row vectors, enforcing rectangularity.
    ///
    /// # Arguments
    ///
    /// * `cols` - The expected cell count of every row.
    /// * `rows` - The row data; ownership of the cell strings is taken.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::Grid` if any row does not have exactly `cols`
    /// cells.
    pub fn from_rows(cols: usize, rows: Vec<Vec<String>>) -> Result<Self> {
        let mut cells = Vec::with_capacity(rows.len() * cols);
        for (index, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(SimqlError::Grid(format!(
                    "row {} has {} cells, expected {}",
                    index,
                    row.len(),
                    cols
                )));
            }
        }
        let row_count = rows.len();
        for row in rows {
            cells.extend(row);
        }
        Ok(RowGrid {
            rows: row_count,
            cols,
            cells,
        })
    }

    /// Number of rows in the grid.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in every row of the grid.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the grid holds no rows at all.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the cell at `(row, col)`, or `None` when out of bounds.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        if row < self.rows && col < self.cols {
            Some(self.cells[row * self.cols + col].as_str())
        } else {
            None
        }
    }

    /// Overwrites the cell at `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `(row, col)` is outside the grid, like indexing a `Vec`.
    pub fn set(&mut self, row: usize, col: usize, value: String) {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({}, {}) outside {}x{} grid",
            row,
            col,
            self.rows,
            self.cols
        );
        self.cells[row * self.cols + col] = value;
    }

    /// Returns one row as a cell slice.
    ///
    /// # Panics
    ///
    /// Panics if `row` is outside the grid.
    pub fn row(&self, row: usize) -> &[String] {
        assert!(row < self.rows, "row {} outside {} rows", row, self.rows);
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    /// Iterates the rows of the grid in order, each as a cell slice.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[String]> {
        self.cells.chunks(self.cols.max(1)).take(self.rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_presized_with_empty_cells() {
        let grid = RowGrid::new(2, 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.cell(1, 2), Some(""));
        assert!(!grid.is_empty());
    }

    #[test]
    fn test_empty_grid_is_valid() {
        let grid = RowGrid::new(0, 4);
        assert!(grid.is_empty());
        assert_eq!(grid.iter_rows().count(), 0);
        assert_eq!(grid.cell(0, 0), None);
    }

    #[test]
    fn test_set_and_cell_round_trip() {
        let mut grid = RowGrid::new(2, 2);
        grid.set(0, 0, "a".to_string());
        grid.set(1, 1, "b".to_string());
        assert_eq!(grid.cell(0, 0), Some("a"));
        assert_eq!(grid.cell(1, 1), Some("b"));
        assert_eq!(grid.cell(0, 1), Some(""));
        assert_eq!(grid.cell(2, 0), None);
    }

    #[test]
    fn test_from_rows_accepts_rectangular_input() {
        let grid = RowGrid::from_rows(
            2,
            vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string(), "Bob".to_string()],
            ],
        )
        .unwrap();
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.row(0), &["1".to_string(), "Alice".to_string()]);
        assert_eq!(grid.row(1), &["2".to_string(), "Bob".to_string()]);
    }

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = RowGrid::from_rows(
            2,
            vec![
                vec!["1".to_string(), "Alice".to_string()],
                vec!["2".to_string()],
            ],
        );
        assert!(result.is_err());
        if let Err(SimqlError::Grid(msg)) = result {
            assert!(msg.contains("row 1"));
            assert!(msg.contains("expected 2"));
        } else {
            panic!("Expected Grid error");
        }
    }

    #[test]
    fn test_iter_rows_yields_rows_in_order() {
        let mut grid = RowGrid::new(3, 1);
        grid.set(0, 0, "x".to_string());
        grid.set(1, 0, "y".to_string());
        grid.set(2, 0, "z".to_string());
        let rows: Vec<&str> = grid.iter_rows().map(|r| r[0].as_str()).collect();
        assert_eq!(rows, vec!["x", "y", "z"]);
    }
}
