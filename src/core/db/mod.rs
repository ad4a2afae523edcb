/// Database Module
///
/// This module provides the database side of the row-exchange engine,
/// organized into focused submodules for better maintainability and
/// separation of concerns.
///
/// ## Architecture
///
/// The database layer is split into four main concerns:
/// - **Provider Abstraction** (`provider.rs`): Capability traits for pluggable drivers and the name-keyed registry
/// - **SQLite Data Provider** (`sqlite.rs`): The bundled driver, built on rusqlite
/// - **Connection Management** (`connection.rs`): Walks profiles through the staged open lifecycle and owns the live connection
/// - **Query Execution** (`query.rs`): The read/write/execute operations over a live connection
///
/// ## Error Handling
///
/// All database operations use the standardized `SimqlError` type for consistent error propagation.
pub mod connection;
pub mod provider;
pub mod query;
pub mod sqlite;

pub use connection::*;
pub use provider::*;
pub use query::*;
pub use sqlite::*;
