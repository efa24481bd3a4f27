//! Server configuration and validation.

pub mod schema;
pub mod validation;

pub use schema::ServerConfig;
pub use validation::ConfigError;
