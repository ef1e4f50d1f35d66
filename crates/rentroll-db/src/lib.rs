//! rentroll database: SurrealDB connection management, schema
//! migrations, repository implementations and demo data.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Repository implementations of the `rentroll-core` traits
//! - Demo data generation ([`seed_data`])
//! - Error types ([`DbError`])

mod connection;
mod error;
pub mod repository;
mod schema;
mod seed;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{current_version, run_migrations};
pub use seed::{SeedReport, seed_data};
