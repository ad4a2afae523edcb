/// Core Module for SIMQL
///
/// This module contains the fundamental components that form the backbone
/// of the simql row-exchange engine. It provides shared infrastructure for
/// provider resolution, connection management, query execution, and error
/// handling.

pub mod db;
pub mod error;

// Re-export commonly used types for convenience
pub use error::{Result, SimqlError};
