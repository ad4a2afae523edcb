/// SIMQL Error Module
///
/// This module defines the error types for the simql row-exchange engine.
/// It provides structured error handling with proper error propagation and
/// operator-friendly error messages.
use thiserror::Error;

/// Comprehensive error type for the simql engine.
///
/// The provider/connection variants mirror the staged connection lifecycle:
/// each step of resolve -> create -> apply string -> open has its own kind so a
/// configuration mistake can be pinpointed from the message alone. Provider and
/// connection failures are terminal for the element instance; every later
/// operation fails fast with `NoConnection`. `BadParameterFormat` aborts only
/// the current call.
#[derive(Error, Debug)]
pub enum SimqlError {
    /// No registered provider factory matched the requested display name.
    /// The message carries every registered name as a diagnostic aid.
    #[error("provider '{name}' not found; available providers are:\n{available}")]
    ProviderNotFound { name: String, available: String },

    /// The resolved factory failed to produce a connection object
    #[error("failed to create connection object: {0}")]
    ConnectionCreate(String),

    /// The connection rejected the configured connection string
    #[error("failed to apply connection string '{raw}': {message}")]
    ConnectionString { raw: String, message: String },

    /// Opening the connection failed (bad credentials, unreachable host, ...)
    #[error("failed to open database connection: {0}")]
    ConnectionOpen(String),

    /// An operation was attempted on an element whose connection never opened
    /// or has already been released
    #[error("no live database connection")]
    NoConnection,

    /// A parameter value or grid cell could not be rendered into a form the
    /// database accepts
    #[error("bad parameter format: {0}")]
    BadParameterFormat(String),

    /// SQL execution errors surfaced by the underlying client
    #[error("query error: {0}")]
    Query(String),

    /// Raw driver errors from the bundled SQLite provider
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration loading and validation errors
    #[error("configuration error: {0}")]
    Config(String),

    /// File system and I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Row grid shape violations (ragged input rows)
    #[error("grid error: {0}")]
    Grid(String),
}

/// Type alias for Result to use SimqlError as the error type.
///
/// This provides a consistent error type across the entire crate
/// instead of using `Result<T, String>` or mixed error types.
pub type Result<T> = std::result::Result<T, SimqlError>;
