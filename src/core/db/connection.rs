/// Database Connection Management Module
///
/// The connection manager walks a profile through the staged lifecycle the
/// provider layer exposes: resolve the factory by display name, create a
/// connection object, apply the connection string, open. Each step fails
/// with its own error kind, and a failure at any step leaves the manager
/// empty rather than half-open.
///
/// A manager owns at most one live connection for its whole lifetime. The
/// connection is released exactly once: explicitly through [`close`]
/// (idempotent) or as a backstop when the manager drops.
///
/// [`close`]: ConnectionManager::close
use crate::core::db::provider::{self, LiveConnection, ProviderFactory};
use crate::core::{Result, SimqlError};
use tracing::debug;

/// The two caller-supplied strings that select and address a database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionProfile {
    /// Provider display name, e.g. `"SQLite Data Provider"`.
    pub provider: String,
    /// Provider-specific connection string.
    pub connection_string: String,
}

impl ConnectionProfile {
    pub fn new(provider: impl Into<String>, connection_string: impl Into<String>) -> Self {
        ConnectionProfile {
            provider: provider.into(),
            connection_string: connection_string.into(),
        }
    }
}

/// Owns one live connection, or none.
#[derive(Default)]
pub struct ConnectionManager {
    live: Option<Box<dyn LiveConnection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        ConnectionManager { live: None }
    }

    /// Opens a connection described by `profile`, resolving the provider
    /// from the process-wide registry.
    ///
    /// # Errors
    ///
    /// Propagates `ProviderNotFound`, `ConnectionCreate`,
    /// `ConnectionString`, or `ConnectionOpen` from whichever step failed.
    /// On any error the manager holds no connection.
    pub fn open(&mut self, profile: &ConnectionProfile) -> Result<()> {
        let factory = provider::resolve_provider(&profile.provider)?;
        self.open_with(factory.as_ref(), &profile.connection_string)
    }

    /// Opens a connection through an explicit factory, bypassing the
    /// registry. Any previously held connection is closed first.
    pub fn open_with(
        &mut self,
        factory: &dyn ProviderFactory,
        connection_string: &str,
    ) -> Result<()> {
        self.close()?;
        let mut builder = factory.create_connection()?;
        builder.set_connection_string(connection_string)?;
        let live = builder.open()?;
        debug!(provider = factory.name(), "database connection opened");
        self.live = Some(live);
        Ok(())
    }

    /// Borrows the live connection.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::NoConnection` when nothing is open, which is
    /// the fail-fast answer every operation gets after a failed or
    /// never-attempted open.
    pub fn connection(&self) -> Result<&dyn LiveConnection> {
        self.live.as_deref().ok_or(SimqlError::NoConnection)
    }

    pub fn is_open(&self) -> bool {
        self.live.is_some()
    }

    /// Releases the connection. Closing an already-closed or never-opened
    /// manager is a no-op.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut live) = self.live.take() {
            live.close()?;
            debug!("database connection closed");
        }
        Ok(())
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(mut live) = self.live.take() {
            let _ = live.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::db::sqlite::SQLITE_PROVIDER_NAME;

    fn memory_profile() -> ConnectionProfile {
        ConnectionProfile::new(SQLITE_PROVIDER_NAME, ":memory:")
    }

    #[test]
    fn test_open_and_query_through_manager() {
        let mut manager = ConnectionManager::new();
        manager.open(&memory_profile()).unwrap();
        assert!(manager.is_open());

        let conn = manager.connection().unwrap();
        conn.execute_statement("CREATE TABLE t (x INTEGER)").unwrap();
        conn.execute_statement("INSERT INTO t VALUES (1)").unwrap();
        let rows = conn.query_grid("SELECT x FROM t").unwrap();
        assert_eq!(rows.rows, vec![vec!["1"]]);
    }

    #[test]
    fn test_unknown_provider_leaves_manager_empty() {
        let mut manager = ConnectionManager::new();
        let err = manager
            .open(&ConnectionProfile::new("Oracle Data Provider", ":memory:"))
            .unwrap_err();
        assert!(matches!(err, SimqlError::ProviderNotFound { .. }));
        assert!(!manager.is_open());
        assert!(matches!(
            manager.connection(),
            Err(SimqlError::NoConnection)
        ));
    }

    #[test]
    fn test_bad_connection_string_leaves_manager_empty() {
        let mut manager = ConnectionManager::new();
        let err = manager
            .open(&ConnectionProfile::new(SQLITE_PROVIDER_NAME, "Version=3"))
            .unwrap_err();
        assert!(matches!(err, SimqlError::ConnectionString { .. }));
        assert!(!manager.is_open());
    }

    #[test]
    fn test_failed_open_leaves_manager_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("nested.db");
        let mut manager = ConnectionManager::new();
        let err = manager
            .open(&ConnectionProfile::new(
                SQLITE_PROVIDER_NAME,
                missing.to_string_lossy().to_string(),
            ))
            .unwrap_err();
        assert!(matches!(err, SimqlError::ConnectionOpen(_)));
        assert!(!manager.is_open());
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut manager = ConnectionManager::new();
        manager.open(&memory_profile()).unwrap();
        manager.close().unwrap();
        manager.close().unwrap();
        assert!(!manager.is_open());
        assert!(matches!(
            manager.connection(),
            Err(SimqlError::NoConnection)
        ));
    }

    #[test]
    fn test_reopen_replaces_previous_connection() {
        let mut manager = ConnectionManager::new();
        manager.open(&memory_profile()).unwrap();
        manager.open(&memory_profile()).unwrap();
        assert!(manager.is_open());
    }
}
