//! Configuration management for the storefront server
//!
//! Reads the YAML configuration file once at startup, resolves it into an
//! immutable [`Config`] and publishes it process-wide through [`global`].

pub mod error;
pub mod global;
pub mod loader;
pub mod schema;
pub mod validation;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validation::*;
