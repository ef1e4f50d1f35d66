//! SurrealDB implementation of [`TenantRepository`].

use chrono::{DateTime, Utc};
use rentroll_core::error::RentRollResult;
use rentroll_core::models::tenant::{Tenant, TenantFields, TenantKind};
use rentroll_core::repository::TenantRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, first_count, parse_optional_uuid, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct TenantRow {
    record_id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    property_id: Option<String>,
    unit_number: Option<String>,
    kind: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TenantRow {
    fn try_into_tenant(self) -> Result<Tenant, DbError> {
        let kind = TenantKind::parse(&self.kind)
            .ok_or_else(|| DbError::invalid_row("tenant", format!("unknown kind: {}", self.kind)))?;
        Ok(Tenant {
            id: parse_uuid("tenant", &self.record_id)?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            property_id: parse_optional_uuid("tenant", self.property_id.as_deref())?,
            unit_number: self.unit_number,
            kind,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Blank optional inputs are stored as NONE.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

const CASCADE_DELETE_QUERY: &str = "\
BEGIN TRANSACTION;
DELETE lease WHERE tenant_id = $id;
DELETE type::record('tenant', $id);
COMMIT TRANSACTION;";

/// SurrealDB implementation of the Tenant repository.
#[derive(Clone)]
pub struct SurrealTenantRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealTenantRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn write(&self, statement: &str, id: Uuid, input: TenantFields) -> Result<(), DbError> {
        self.db
            .query(statement)
            .bind(("id", id.to_string()))
            .bind(("name", input.name.trim().to_string()))
            .bind(("email", non_blank(input.email)))
            .bind(("phone", non_blank(input.phone)))
            .bind(("property_id", input.property_id.map(|p| p.to_string())))
            .bind(("unit_number", non_blank(input.unit_number)))
            .bind(("kind", input.kind.as_str().to_string()))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }
}

impl<C: Connection> TenantRepository for SurrealTenantRepository<C> {
    async fn create(&self, input: TenantFields) -> RentRollResult<Tenant> {
        let id = Uuid::now_v7();
        self.write(
            "CREATE type::record('tenant', $id) SET \
             name = $name, email = $email, phone = $phone, \
             property_id = $property_id, unit_number = $unit_number, \
             kind = $kind",
            id,
            input,
        )
        .await?;
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> RentRollResult<Tenant> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('tenant', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "tenant".into(),
            id: id_str,
        })?;

        Ok(row.try_into_tenant()?)
    }

    async fn update(&self, id: Uuid, input: TenantFields) -> RentRollResult<Tenant> {
        self.get_by_id(id).await?;
        self.write(
            "UPDATE type::record('tenant', $id) SET \
             name = $name, email = $email, phone = $phone, \
             property_id = $property_id, unit_number = $unit_number, \
             kind = $kind, updated_at = time::now()",
            id,
            input,
        )
        .await?;
        self.get_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> RentRollResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query(CASCADE_DELETE_QUERY)
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?
            .check()
            .map_err(|e| DbError::Query(format!("tenant delete failed: {e}")))?;

        Ok(())
    }

    async fn list(&self, property_id: Option<Uuid>) -> RentRollResult<Vec<Tenant>> {
        let mut result = match property_id {
            Some(property_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM tenant \
                     WHERE property_id = $property_id \
                     ORDER BY name ASC, created_at ASC",
                )
                .bind(("property_id", property_id.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM tenant \
                     ORDER BY name ASC, created_at ASC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<TenantRow> = result.take(0).map_err(DbError::from)?;
        let items = rows
            .into_iter()
            .map(TenantRow::try_into_tenant)
            .collect::<Result<Vec<_>, DbError>>()?;
        Ok(items)
    }

    async fn count(&self) -> RentRollResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM tenant GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_count(rows))
    }
}
