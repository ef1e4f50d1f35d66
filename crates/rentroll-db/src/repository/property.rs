//! SurrealDB implementation of [`PropertyRepository`].
//!
//! Merges and cascading deletes run as a single SurrealQL transaction so a
//! failure part way leaves no orphaned tenants or leases behind.

use chrono::{DateTime, Utc};
use rentroll_core::error::RentRollResult;
use rentroll_core::models::property::{Property, PropertyFields};
use rentroll_core::registrar::MergePlan;
use rentroll_core::repository::PropertyRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, first_count, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct PropertyRow {
    record_id: String,
    name: String,
    address: String,
    note: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PropertyRow {
    fn try_into_property(self) -> Result<Property, DbError> {
        Ok(Property {
            id: parse_uuid("property", &self.record_id)?,
            name: self.name,
            address: self.address,
            note: self.note,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Re-parent every tenant and lease of `$duplicates`, then drop them.
const MERGE_QUERY: &str = "\
BEGIN TRANSACTION;
UPDATE type::record('property', $survivor) SET \
    name = $name, address = $address, note = $note, \
    updated_at = time::now();
UPDATE tenant SET property_id = $survivor, updated_at = time::now() \
    WHERE property_id IN $duplicates;
UPDATE lease SET property_id = $survivor, updated_at = time::now() \
    WHERE property_id IN $duplicates;
DELETE property WHERE meta::id(id) IN $duplicates;
COMMIT TRANSACTION;";

const UPDATE_QUERY: &str = "\
UPDATE type::record('property', $survivor) SET \
    name = $name, address = $address, note = $note, \
    updated_at = time::now()";

/// Leases are removed both by property and by tenant so a lease filed
/// under another property for one of these tenants does not dangle.
const CASCADE_DELETE_QUERY: &str = "\
BEGIN TRANSACTION;
LET $tenants = (SELECT VALUE meta::id(id) FROM tenant WHERE property_id = $id);
DELETE lease WHERE property_id = $id OR tenant_id IN $tenants;
DELETE tenant WHERE property_id = $id;
DELETE type::record('property', $id);
COMMIT TRANSACTION;";

/// SurrealDB implementation of the Property repository.
#[derive(Clone)]
pub struct SurrealPropertyRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealPropertyRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }
}

impl<C: Connection> PropertyRepository for SurrealPropertyRepository<C> {
    async fn create(&self, input: PropertyFields) -> RentRollResult<Property> {
        let id = Uuid::now_v7();

        self.db
            .query(
                "CREATE type::record('property', $id) SET \
                 name = $name, address = $address, note = $note",
            )
            .bind(("id", id.to_string()))
            .bind(("name", input.name))
            .bind(("address", input.address))
            .bind(("note", input.note))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> RentRollResult<Property> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('property', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "property".into(),
            id: id_str,
        })?;

        Ok(row.try_into_property()?)
    }

    async fn list(&self) -> RentRollResult<Vec<Property>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property \
                 ORDER BY name ASC, created_at ASC",
            )
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(PropertyRow::try_into_property)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }

    async fn find_by_name(&self, name: &str) -> RentRollResult<Vec<Property>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM property \
                 WHERE string::lowercase(name) = $name \
                 ORDER BY created_at ASC, id ASC",
            )
            .bind(("name", name.trim().to_lowercase()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<PropertyRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(PropertyRow::try_into_property)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }

    async fn apply_merge(&self, plan: &MergePlan, input: PropertyFields) -> RentRollResult<Property> {
        let Some(survivor) = plan.survivor_id() else {
            return self.create(input).await;
        };

        let query = if plan.needs_reparenting() {
            MERGE_QUERY
        } else {
            UPDATE_QUERY
        };
        let duplicates: Vec<String> = plan.duplicates.iter().map(Uuid::to_string).collect();

        self.db
            .query(query)
            .bind(("survivor", survivor.to_string()))
            .bind(("duplicates", duplicates))
            .bind(("name", input.name))
            .bind(("address", input.address))
            .bind(("note", input.note))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(format!("property merge failed: {e}")))?;

        self.get_by_id(survivor).await
    }

    async fn delete(&self, id: Uuid) -> RentRollResult<()> {
        // Surface NotFound instead of silently deleting nothing.
        self.get_by_id(id).await?;

        self.db
            .query(CASCADE_DELETE_QUERY)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(format!("property delete failed: {e}")))?;

        Ok(())
    }

    async fn count(&self) -> RentRollResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM property GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_count(rows))
    }
}
