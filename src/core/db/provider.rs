/// Data Provider Abstraction Module
///
/// A data provider is the pluggable driver behind the engine: it knows how to
/// manufacture connection objects for one database technology. Providers are
/// looked up by display name in a process-wide registry, so a model can say
/// "SQLite Data Provider" and stay ignorant of the crate that implements it.
///
/// Connection establishment is deliberately staged into three capabilities,
/// one per failure mode a caller wants to distinguish: creating the
/// connection object, applying the connection string, and opening the
/// physical connection.
use crate::core::{Result, SimqlError};
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex};

/// Rows returned by a select, with the column names the statement produced.
#[derive(Debug, Clone, Default)]
pub struct QueryRows {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// A named driver that can manufacture connection builders.
pub trait ProviderFactory: Send + Sync {
    /// Display name used for registry lookup, e.g. `"SQLite Data Provider"`.
    fn name(&self) -> &str;

    /// Creates a fresh, unconfigured connection builder.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::ConnectionCreate` when the driver cannot
    /// manufacture a connection object at all.
    fn create_connection(&self) -> Result<Box<dyn ConnectionBuilder>>;
}

/// A connection object that has been created but not yet opened.
pub trait ConnectionBuilder: Send {
    /// Applies the provider-specific connection string.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::ConnectionString` when the string cannot be
    /// applied to this driver, carrying the raw string for diagnostics.
    fn set_connection_string(&mut self, raw: &str) -> Result<()>;

    /// Opens the physical connection, consuming the builder.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::ConnectionOpen` when the database cannot be
    /// reached or opened.
    fn open(self: Box<Self>) -> Result<Box<dyn LiveConnection>>;
}

/// An open connection ready for statements.
///
/// All query methods take `&self`; only [`LiveConnection::close`] mutates,
/// and a closed connection answers every later call with
/// `SimqlError::NoConnection`.
pub trait LiveConnection: Send {
    /// Runs a select and collects every row as strings.
    fn query_grid(&self, sql: &str) -> Result<QueryRows>;

    /// Runs a non-query statement, returning the affected row count.
    fn execute_statement(&self, sql: &str) -> Result<usize>;

    /// Reports the column names of `table`, in declaration order.
    fn table_columns(&self, table: &str) -> Result<Vec<String>>;

    /// Inserts `rows` via a prepared `template`, one execution per row.
    /// Returns the number of rows inserted.
    fn insert_rows(&self, template: &str, rows: &[Vec<String>]) -> Result<usize>;

    /// Closes the connection. Closing twice is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// The set of registered providers, keyed by display name.
///
/// Registration order is preserved so the not-found diagnostic lists
/// providers the way they were installed.
#[derive(Default)]
pub struct ProviderRegistry {
    factories: Vec<Arc<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        ProviderRegistry {
            factories: Vec::new(),
        }
    }

    /// A registry pre-loaded with the providers this crate ships.
    pub fn with_builtins() -> Self {
        let mut registry = ProviderRegistry::new();
        registry.register(Arc::new(super::sqlite::SqliteFactory));
        registry
    }

    /// Installs a factory, replacing any earlier one with the same name.
    pub fn register(&mut self, factory: Arc<dyn ProviderFactory>) {
        self.factories.retain(|f| f.name() != factory.name());
        self.factories.push(factory);
    }

    /// Looks up a provider by exact display name.
    ///
    /// # Errors
    ///
    /// Returns `SimqlError::ProviderNotFound` listing every registered
    /// provider name, one per line, so a misspelled name is easy to fix.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn ProviderFactory>> {
        self.factories
            .iter()
            .find(|f| f.name() == name)
            .cloned()
            .ok_or_else(|| SimqlError::ProviderNotFound {
                name: name.to_string(),
                available: self.provider_names().join("\n"),
            })
    }

    /// Names of every registered provider, in registration order.
    pub fn provider_names(&self) -> Vec<String> {
        self.factories.iter().map(|f| f.name().to_string()).collect()
    }
}

static REGISTRY: OnceCell<Mutex<ProviderRegistry>> = OnceCell::new();

fn registry() -> &'static Mutex<ProviderRegistry> {
    REGISTRY.get_or_init(|| Mutex::new(ProviderRegistry::with_builtins()))
}

/// Installs a provider into the process-wide registry.
pub fn register_provider(factory: Arc<dyn ProviderFactory>) {
    registry().lock().unwrap().register(factory);
}

/// Resolves a provider from the process-wide registry.
pub fn resolve_provider(name: &str) -> Result<Arc<dyn ProviderFactory>> {
    registry().lock().unwrap().resolve(name)
}

/// Names of every provider in the process-wide registry.
pub fn provider_names() -> Vec<String> {
    registry().lock().unwrap().provider_names()
}
