/// SQLite Data Provider Module
///
/// The provider this crate ships in-tree, built on the bundled `rusqlite`
/// client. It registers under the display name `"SQLite Data Provider"` and
/// implements the full staged connection lifecycle: builder creation,
/// connection-string application, open, and idempotent close.
///
/// Connection strings come in three accepted shapes: a bare filesystem path,
/// the literal `:memory:`, or an ADO-style `Data Source=<path>;...` pair
/// list. In the pair form, keys other than `Data Source` are accepted and
/// ignored. A bare path containing `=` is read as the pair form.
use crate::core::db::provider::{ConnectionBuilder, LiveConnection, ProviderFactory, QueryRows};
use crate::core::{Result, SimqlError};
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};
use std::path::PathBuf;
use tracing::debug;

/// Registry display name for this provider.
pub const SQLITE_PROVIDER_NAME: &str = "SQLite Data Provider";

pub struct SqliteFactory;

impl ProviderFactory for SqliteFactory {
    fn name(&self) -> &str {
        SQLITE_PROVIDER_NAME
    }

    fn create_connection(&self) -> Result<Box<dyn ConnectionBuilder>> {
        Ok(Box::new(SqliteBuilder { target: None }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SqliteTarget {
    Memory,
    File(PathBuf),
}

pub struct SqliteBuilder {
    target: Option<SqliteTarget>,
}

fn parse_connection_string(raw: &str) -> Result<SqliteTarget> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SimqlError::ConnectionString {
            raw: raw.to_string(),
            message: "connection string is empty".to_string(),
        });
    }
    if trimmed.contains('=') {
        let mut source = None;
        for pair in trimmed.split(';') {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            match pair.split_once('=') {
                Some((key, value)) => {
                    if key.trim().eq_ignore_ascii_case("data source") {
                        source = Some(value.trim().to_string());
                    }
                }
                None => {
                    return Err(SimqlError::ConnectionString {
                        raw: raw.to_string(),
                        message: format!("malformed 'key=value' pair: '{}'", pair),
                    });
                }
            }
        }
        return match source {
            Some(path) if path == ":memory:" => Ok(SqliteTarget::Memory),
            Some(path) => Ok(SqliteTarget::File(PathBuf::from(path))),
            None => Err(SimqlError::ConnectionString {
                raw: raw.to_string(),
                message: "no 'Data Source' entry found".to_string(),
            }),
        };
    }
    if trimmed == ":memory:" {
        Ok(SqliteTarget::Memory)
    } else {
        Ok(SqliteTarget::File(PathBuf::from(trimmed)))
    }
}

impl ConnectionBuilder for SqliteBuilder {
    fn set_connection_string(&mut self, raw: &str) -> Result<()> {
        self.target = Some(parse_connection_string(raw)?);
        Ok(())
    }

    fn open(self: Box<Self>) -> Result<Box<dyn LiveConnection>> {
        let target = self.target.ok_or_else(|| {
            SimqlError::ConnectionOpen("no connection string was applied".to_string())
        })?;
        let conn = match &target {
            SqliteTarget::Memory => Connection::open_in_memory(),
            SqliteTarget::File(path) => Connection::open(path),
        }
        .map_err(|e| SimqlError::ConnectionOpen(e.to_string()))?;
        debug!(?target, "opened sqlite connection");
        Ok(Box::new(SqliteConnection { conn: Some(conn) }))
    }
}

pub struct SqliteConnection {
    conn: Option<Connection>,
}

impl SqliteConnection {
    fn handle(&self) -> Result<&Connection> {
        self.conn.as_ref().ok_or(SimqlError::NoConnection)
    }
}

/// Literal string form of a database value. SQL NULL reads as the empty
/// string; text and blob columns read as (lossy) UTF-8.
fn stringify_value(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => String::new(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(r) => r.to_string(),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            String::from_utf8_lossy(bytes).into_owned()
        }
    }
}

impl LiveConnection for SqliteConnection {
    fn query_grid(&self, sql: &str) -> Result<QueryRows> {
        let conn = self.handle()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SimqlError::Query(format!("failed to prepare '{}': {}", sql, e)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
        let column_count = columns.len();
        let mut rows = stmt
            .query([])
            .map_err(|e| SimqlError::Query(format!("failed to run '{}': {}", sql, e)))?;
        let mut collected = Vec::new();
        while let Some(row) = rows.next()? {
            let mut cells = Vec::with_capacity(column_count);
            for index in 0..column_count {
                cells.push(stringify_value(row.get_ref(index)?));
            }
            collected.push(cells);
        }
        debug!(rows = collected.len(), "collected query rows");
        Ok(QueryRows {
            columns,
            rows: collected,
        })
    }

    fn execute_statement(&self, sql: &str) -> Result<usize> {
        let conn = self.handle()?;
        conn.execute(sql, [])
            .map_err(|e| SimqlError::Query(format!("failed to execute '{}': {}", sql, e)))
    }

    fn table_columns(&self, table: &str) -> Result<Vec<String>> {
        let conn = self.handle()?;
        let stmt = conn
            .prepare(&format!("SELECT * FROM {}", table))
            .map_err(|e| SimqlError::Query(format!("failed to inspect table '{}': {}", table, e)))?;
        Ok(stmt.column_names().iter().map(|c| c.to_string()).collect())
    }

    fn insert_rows(&self, template: &str, rows: &[Vec<String>]) -> Result<usize> {
        let conn = self.handle()?;
        let mut stmt = conn
            .prepare(template)
            .map_err(|e| SimqlError::Query(format!("failed to prepare '{}': {}", template, e)))?;
        let mut inserted = 0;
        for row in rows {
            inserted += stmt
                .execute(params_from_iter(row.iter()))
                .map_err(|e| match e {
                    rusqlite::Error::InvalidParameterCount(got, want) => {
                        SimqlError::BadParameterFormat(format!(
                            "row supplied {} values, statement expects {}",
                            got, want
                        ))
                    }
                    rusqlite::Error::ToSqlConversionFailure(source) => {
                        SimqlError::BadParameterFormat(format!(
                            "value conversion failed: {}",
                            source
                        ))
                    }
                    other => SimqlError::Query(format!("insert failed: {}", other)),
                })?;
        }
        Ok(inserted)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, e)| SimqlError::Query(format!("failed to close connection: {}", e)))?;
            debug!("closed sqlite connection");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_memory() -> Box<dyn LiveConnection> {
        let factory = SqliteFactory;
        let mut builder = factory.create_connection().unwrap();
        builder.set_connection_string(":memory:").unwrap();
        builder.open().unwrap()
    }

    #[test]
    fn test_parse_bare_path_and_memory() {
        assert_eq!(parse_connection_string(":memory:").unwrap(), SqliteTarget::Memory);
        assert_eq!(
            parse_connection_string("jobs.db").unwrap(),
            SqliteTarget::File(PathBuf::from("jobs.db"))
        );
    }

    #[test]
    fn test_parse_ado_style_pairs() {
        assert_eq!(
            parse_connection_string("Data Source=plant.db;Version=3;").unwrap(),
            SqliteTarget::File(PathBuf::from("plant.db"))
        );
        assert_eq!(
            parse_connection_string("data source = :memory:").unwrap(),
            SqliteTarget::Memory
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert!(matches!(
            parse_connection_string("   "),
            Err(SimqlError::ConnectionString { .. })
        ));
        assert!(matches!(
            parse_connection_string("Version=3;plant.db"),
            Err(SimqlError::ConnectionString { .. })
        ));
        assert!(matches!(
            parse_connection_string("Version=3"),
            Err(SimqlError::ConnectionString { .. })
        ));
    }

    #[test]
    fn test_open_without_connection_string_fails() {
        let factory = SqliteFactory;
        let builder = factory.create_connection().unwrap();
        assert!(matches!(
            builder.open(),
            Err(SimqlError::ConnectionOpen(_))
        ));
    }

    #[test]
    fn test_query_grid_stringifies_every_kind() {
        let conn = open_memory();
        conn.execute_statement(
            "CREATE TABLE samples (id INTEGER, ratio REAL, label TEXT, note TEXT)",
        )
        .unwrap();
        conn.execute_statement("INSERT INTO samples VALUES (7, 2.5, 'widget', NULL)")
            .unwrap();

        let result = conn.query_grid("SELECT * FROM samples").unwrap();
        assert_eq!(result.columns, vec!["id", "ratio", "label", "note"]);
        assert_eq!(result.rows, vec![vec!["7", "2.5", "widget", ""]]);
    }

    #[test]
    fn test_table_columns_reports_declaration_order() {
        let conn = open_memory();
        conn.execute_statement("CREATE TABLE jobs (name TEXT, due TEXT, qty REAL)")
            .unwrap();
        assert_eq!(conn.table_columns("jobs").unwrap(), vec!["name", "due", "qty"]);
    }

    #[test]
    fn test_insert_rows_executes_template_per_row() {
        let conn = open_memory();
        conn.execute_statement("CREATE TABLE jobs (name TEXT, qty REAL)")
            .unwrap();
        let inserted = conn
            .insert_rows(
                "INSERT INTO jobs (name, qty) VALUES (?1, ?2)",
                &[
                    vec!["drill".to_string(), "2".to_string()],
                    vec!["weld".to_string(), "5".to_string()],
                ],
            )
            .unwrap();
        assert_eq!(inserted, 2);

        let result = conn.query_grid("SELECT name FROM jobs ORDER BY name").unwrap();
        assert_eq!(result.rows, vec![vec!["drill"], vec!["weld"]]);
    }

    #[test]
    fn test_insert_rows_flags_short_rows_as_bad_parameters() {
        let conn = open_memory();
        conn.execute_statement("CREATE TABLE jobs (name TEXT, qty REAL)")
            .unwrap();
        let err = conn
            .insert_rows(
                "INSERT INTO jobs (name, qty) VALUES (?1, ?2)",
                &[vec!["drill".to_string()]],
            )
            .unwrap_err();
        assert!(matches!(err, SimqlError::BadParameterFormat(_)));
    }

    #[test]
    fn test_close_is_idempotent_and_fails_fast_after() {
        let mut conn = open_memory();
        conn.close().unwrap();
        conn.close().unwrap();
        assert!(matches!(
            conn.query_grid("SELECT 1"),
            Err(SimqlError::NoConnection)
        ));
        assert!(matches!(
            conn.execute_statement("SELECT 1"),
            Err(SimqlError::NoConnection)
        ));
    }
}
