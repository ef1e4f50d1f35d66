//! SurrealDB repository implementations.

mod lease;
mod property;
mod session;
mod tenant;
mod user;

use chrono::NaiveDate;
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

pub use lease::SurrealLeaseRepository;
pub use property::SurrealPropertyRepository;
pub use session::SurrealSessionRepository;
pub use tenant::SurrealTenantRepository;
pub use user::{SurrealUserRepository, hash_password};

/// Row struct for count queries.
#[derive(Debug, SurrealValue)]
struct CountRow {
    total: u64,
}

fn parse_uuid(entity: &'static str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value).map_err(|e| DbError::invalid_row(entity, format!("invalid UUID: {e}")))
}

fn parse_optional_uuid(entity: &'static str, value: Option<&str>) -> Result<Option<Uuid>, DbError> {
    value.map(|v| parse_uuid(entity, v)).transpose()
}

/// Dates are stored as `YYYY-MM-DD` strings.
fn parse_date(entity: &'static str, value: &str) -> Result<NaiveDate, DbError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| DbError::invalid_row(entity, format!("invalid date {value:?}: {e}")))
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn first_count(rows: Vec<CountRow>) -> u64 {
    rows.first().map(|r| r.total).unwrap_or(0)
}
