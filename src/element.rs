/// Exchange Element Module
///
/// A [`DbExchange`] is the host-facing unit of this engine: one element per
/// model run, constructed with a connection profile and a reporting sink,
/// owning exactly one connection for its lifetime. Operations are
/// single-threaded, one call at a time; a host that runs concurrent logic
/// must serialize calls into the same element.
///
/// Construction never fails. If the connection cannot be opened, the
/// failure is reported through the sink and the element stays alive in a
/// no-connection state where every operation fails fast instead of
/// retrying the open.
use crate::coerce::{sql_literal, TypedValue};
use crate::core::db::connection::{ConnectionManager, ConnectionProfile};
use crate::core::db::query::{ExecuteOutcome, QueryExecutor, ReadOutcome};
use crate::core::Result;
use crate::grid::RowGrid;
use crate::report::RunReporter;
use crate::sqlgen::WhereTerm;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

/// One (column, value) term of a read request. The value is rendered to its
/// SQL literal form (numbers bare, dates and text quoted) before WHERE
/// assembly; an absent value renders as the empty string.
#[derive(Debug, Clone)]
pub struct ReadFilter {
    pub column: String,
    pub value: Option<TypedValue>,
}

impl ReadFilter {
    pub fn new(column: impl Into<String>, value: impl Into<TypedValue>) -> Self {
        ReadFilter {
            column: column.into(),
            value: Some(value.into()),
        }
    }

    pub fn absent(column: impl Into<String>) -> Self {
        ReadFilter {
            column: column.into(),
            value: None,
        }
    }
}

pub struct DbExchange {
    id: Uuid,
    profile: ConnectionProfile,
    manager: ConnectionManager,
    reporter: Arc<dyn RunReporter>,
}

impl DbExchange {
    /// Builds an element and opens its connection.
    ///
    /// A failed open is reported through `reporter` and leaves the element
    /// in the no-connection state; it is not retried.
    pub fn connect(profile: ConnectionProfile, reporter: Arc<dyn RunReporter>) -> Self {
        let id = Uuid::new_v4();
        let mut manager = ConnectionManager::new();
        match manager.open(&profile) {
            Ok(()) => {
                debug!(element = %id, provider = %profile.provider, "exchange element connected");
            }
            Err(err) => {
                reporter.report_error(&err.to_string());
            }
        }
        DbExchange {
            id,
            profile,
            manager,
            reporter,
        }
    }

    /// Stable instance id, used to correlate log lines from one element.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn provider(&self) -> &str {
        &self.profile.provider
    }

    pub fn is_connected(&self) -> bool {
        self.manager.is_open()
    }

    /// Substitutes `params` into `template` and runs it as a non-query
    /// statement, returning the affected-row count.
    pub fn execute(&self, template: &str, params: &[TypedValue]) -> Result<usize> {
        match self.run_execute(template, params) {
            Ok(outcome) => {
                self.reporter.trace(&format!(
                    "executed statement {} affecting {} rows",
                    outcome.sql, outcome.affected
                ));
                Ok(outcome.affected)
            }
            Err(err) => {
                self.reporter.report_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Reads filtered rows of `table` into a grid of `column_count` columns.
    pub fn read_table(
        &self,
        table: &str,
        filters: &[ReadFilter],
        column_count: usize,
    ) -> Result<ReadOutcome> {
        match self.run_read(table, filters, column_count) {
            Ok(outcome) => {
                self.reporter.trace(&format!(
                    "read {} rows from table {}",
                    outcome.row_count, table
                ));
                Ok(outcome)
            }
            Err(err) => {
                self.reporter.report_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Appends the first `row_count` rows of `grid` to `table`.
    pub fn write_table(&self, table: &str, grid: &RowGrid, row_count: usize) -> Result<usize> {
        match self.run_write(table, grid, row_count) {
            Ok(inserted) => {
                self.reporter
                    .trace(&format!("inserted {} rows into table {}", inserted, table));
                Ok(inserted)
            }
            Err(err) => {
                self.reporter.report_error(&err.to_string());
                Err(err)
            }
        }
    }

    /// Releases the connection. Safe to call more than once; also runs
    /// implicitly when the element drops.
    pub fn shutdown(&mut self) -> Result<()> {
        match self.manager.close() {
            Ok(()) => {
                debug!(element = %self.id, "exchange element shut down");
                Ok(())
            }
            Err(err) => {
                self.reporter.report_error(&err.to_string());
                Err(err)
            }
        }
    }

    fn run_execute(&self, template: &str, params: &[TypedValue]) -> Result<ExecuteOutcome> {
        let conn = self.manager.connection()?;
        QueryExecutor::new(conn).execute(template, params)
    }

    fn run_read(
        &self,
        table: &str,
        filters: &[ReadFilter],
        column_count: usize,
    ) -> Result<ReadOutcome> {
        let conn = self.manager.connection()?;
        let terms: Vec<WhereTerm> = filters
            .iter()
            .map(|f| WhereTerm::new(f.column.clone(), sql_literal(f.value.as_ref())))
            .collect();
        QueryExecutor::new(conn).read(table, &terms, column_count)
    }

    fn run_write(&self, table: &str, grid: &RowGrid, row_count: usize) -> Result<usize> {
        let conn = self.manager.connection()?;
        QueryExecutor::new(conn).write(table, grid, row_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::sqlite::SQLITE_PROVIDER_NAME;
    use crate::core::SimqlError;
    use crate::report::BufferedReporter;

    fn memory_element(reporter: Arc<BufferedReporter>) -> DbExchange {
        DbExchange::connect(
            ConnectionProfile::new(SQLITE_PROVIDER_NAME, ":memory:"),
            reporter,
        )
    }

    #[test]
    fn test_operations_emit_trace_lines() {
        let reporter = Arc::new(BufferedReporter::new());
        let element = memory_element(reporter.clone());
        assert!(element.is_connected());

        element
            .execute("CREATE TABLE jobs (name TEXT, qty REAL)", &[])
            .unwrap();
        let grid = RowGrid::from_rows(
            2,
            vec![
                vec!["drill".to_string(), "2".to_string()],
                vec!["weld".to_string(), "5".to_string()],
            ],
        )
        .unwrap();
        element.write_table("jobs", &grid, 2).unwrap();
        let outcome = element
            .read_table("jobs", &[ReadFilter::new("name", "weld")], 2)
            .unwrap();
        assert_eq!(outcome.row_count, 1);
        assert_eq!(outcome.grid.row(0), ["weld", "5"]);

        let traces = reporter.traces();
        assert!(traces.iter().any(|t| t.contains("affecting 0 rows")));
        assert!(traces.contains(&"inserted 2 rows into table jobs".to_string()));
        assert!(traces.contains(&"read 1 rows from table jobs".to_string()));
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn test_numeric_filter_is_rendered_bare() {
        let reporter = Arc::new(BufferedReporter::new());
        let element = memory_element(reporter);
        element
            .execute("CREATE TABLE jobs (name TEXT, qty REAL)", &[])
            .unwrap();
        element
            .execute("INSERT INTO jobs VALUES ('drill', 2.5)", &[])
            .unwrap();

        let outcome = element
            .read_table("jobs", &[ReadFilter::new("qty", 2.5)], 2)
            .unwrap();
        assert_eq!(outcome.row_count, 1);
    }

    #[test]
    fn test_failed_connect_reports_and_fails_fast() {
        let reporter = Arc::new(BufferedReporter::new());
        let element = DbExchange::connect(
            ConnectionProfile::new("PostgreSQL Data Provider", "host=nowhere"),
            reporter.clone(),
        );
        assert!(!element.is_connected());
        assert_eq!(reporter.errors().len(), 1);
        assert!(reporter.errors()[0].contains("PostgreSQL Data Provider"));
        assert!(reporter.errors()[0].contains(SQLITE_PROVIDER_NAME));

        let err = element.execute("SELECT 1", &[]).unwrap_err();
        assert!(matches!(err, SimqlError::NoConnection));
        let err = element.read_table("jobs", &[], 1).unwrap_err();
        assert!(matches!(err, SimqlError::NoConnection));
        // One error per failed call, after the connect failure itself.
        assert_eq!(reporter.errors().len(), 3);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let reporter = Arc::new(BufferedReporter::new());
        let mut element = memory_element(reporter.clone());
        element.shutdown().unwrap();
        element.shutdown().unwrap();
        assert!(!element.is_connected());
        assert!(matches!(
            element.execute("SELECT 1", &[]),
            Err(SimqlError::NoConnection)
        ));
    }
}
