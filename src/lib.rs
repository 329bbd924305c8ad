//! # Harbor Registry
//!
//! Port-authority ship registry with role-based access control.
//!
//! ## Architecture
//!
//! - **domain**: error taxonomy shared across the service
//! - **infrastructure**: database connection, entities and migrations
//! - **auth**: JWT authentication and the three role gates
//! - **api**: REST API with Swagger documentation
//! - **config**: TOML configuration loading

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig};

// Re-export API router
pub use api::create_api_router;
