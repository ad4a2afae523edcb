// Core infrastructure modules
pub mod core;

// Engine modules
pub mod coerce;
pub mod config;
pub mod element;
pub mod grid;
pub mod report;
pub mod sqlgen;
