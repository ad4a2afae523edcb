/// Query Execution Module
///
/// This module provides the three row-exchange operations the engine offers:
/// raw-execute with positional substitution, filtered table read into a
/// [`RowGrid`], and grid write via generated inserts. Each operation is a
/// one-shot, blocking call against a borrowed live connection; nothing is
/// retained across calls and nothing is retried.
use crate::coerce::{render_param, TypedValue};
use crate::core::db::provider::LiveConnection;
use crate::core::{Result, SimqlError};
use crate::grid::RowGrid;
use crate::sqlgen::{self, WhereTerm};
use tracing::debug;

/// Result of a raw-execute call: the final SQL after substitution and the
/// affected-row count the database reported.
#[derive(Debug)]
pub struct ExecuteOutcome {
    pub sql: String,
    pub affected: usize,
}

/// Result of a table read: the populated grid and the matched row count.
#[derive(Debug)]
pub struct ReadOutcome {
    pub grid: RowGrid,
    pub row_count: usize,
}

/// Query execution service that operates on a live database connection.
pub struct QueryExecutor<'a> {
    connection: &'a dyn LiveConnection,
}

impl<'a> QueryExecutor<'a> {
    /// Creates a new QueryExecutor for the given connection.
    pub fn new(connection: &'a dyn LiveConnection) -> Self {
        QueryExecutor { connection }
    }

    /// Substitutes `params` into the `@n` markers of `template` (highest
    /// index first) and runs the result as a non-query statement.
    ///
    /// This is textual substitution, not parameter binding: every value is
    /// rendered to its token form and spliced into the SQL string.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::BadParameterFormat` if a parameter has no token
    /// form, and `SimqlError::Query` if the statement fails. Neither error
    /// disturbs the connection; later calls proceed normally.
    pub fn execute(&self, template: &str, params: &[TypedValue]) -> Result<ExecuteOutcome> {
        let mut rendered = Vec::with_capacity(params.len());
        for value in params {
            rendered.push(render_param(value)?);
        }
        let sql = sqlgen::substitute_positional(template, &rendered);
        let affected = self.connection.execute_statement(&sql)?;
        debug!(affected, "statement executed");
        Ok(ExecuteOutcome { sql, affected })
    }

    /// Reads `SELECT * FROM table`, filtered by `filters`, into a grid of
    /// exactly `column_count` columns.
    ///
    /// The grid is pre-sized to `rows x column_count` and populated
    /// positionally: result columns beyond `column_count` are dropped, and
    /// when the result is narrower the trailing cells stay empty. The caller
    /// supplies `column_count` from the destination shape, so the grid
    /// always matches what the destination can hold.
    pub fn read(
        &self,
        table: &str,
        filters: &[WhereTerm],
        column_count: usize,
    ) -> Result<ReadOutcome> {
        let clause = sqlgen::where_clause(filters);
        let sql = sqlgen::select_all(table, &clause);
        let result = self.connection.query_grid(&sql)?;
        let row_count = result.rows.len();

        let mut grid = RowGrid::new(row_count, column_count);
        for (r, row) in result.rows.iter().enumerate() {
            for (c, cell) in row.iter().take(column_count).enumerate() {
                grid.set(r, c, cell.clone());
            }
        }
        debug!(rows = row_count, table, "table read complete");
        Ok(ReadOutcome { grid, row_count })
    }

    /// Appends the first `row_count` rows of `grid` to `table`.
    ///
    /// The target's column layout is learned by selecting the full table
    /// once; the insert template is generated from that layout and executed
    /// per row in one batch. Grid column `j` maps to table column `j`
    /// positionally, so the caller's column order must match the table's.
    /// A grid narrower than the table fills only the leading columns.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::BadParameterFormat` when the grid is wider than
    /// the table or holds fewer rows than `row_count`, and `SimqlError::Query`
    /// if any insert fails.
    pub fn write(&self, table: &str, grid: &RowGrid, row_count: usize) -> Result<usize> {
        if row_count == 0 {
            return Ok(0);
        }
        if row_count > grid.rows() {
            return Err(SimqlError::BadParameterFormat(format!(
                "asked to write {} rows but the grid holds {}",
                row_count,
                grid.rows()
            )));
        }
        let columns = self.connection.table_columns(table)?;
        if grid.cols() > columns.len() {
            return Err(SimqlError::BadParameterFormat(format!(
                "grid has {} columns but table '{}' has only {}",
                grid.cols(),
                table,
                columns.len()
            )));
        }
        let template = sqlgen::insert_template(table, &columns[..grid.cols()]);
        let rows: Vec<Vec<String>> = grid
            .iter_rows()
            .take(row_count)
            .map(|row| row.to_vec())
            .collect();
        let inserted = self.connection.insert_rows(&template, &rows)?;
        debug!(rows = inserted, table, "table write complete");
        Ok(inserted)
    }
}
