//! Handler module declarations and re-exports

pub mod config;
pub mod layers;
pub mod query;
pub mod statistics;

// Re-export all handlers for convenient access
pub use config::*;
pub use layers::*;
pub use query::*;
pub use statistics::*;
