//! SurrealDB implementation of [`LeaseRepository`].

use chrono::{DateTime, Utc};
use rentroll_core::error::RentRollResult;
use rentroll_core::models::lease::{Lease, LeaseFields, LeaseStatus};
use rentroll_core::repository::LeaseRepository;
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use super::{CountRow, first_count, format_date, parse_date, parse_uuid};
use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct LeaseRow {
    record_id: String,
    property_id: String,
    tenant_id: String,
    unit_number: Option<String>,
    rent: i64,
    start_date: String,
    end_date: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LeaseRow {
    fn try_into_lease(self) -> Result<Lease, DbError> {
        let status = LeaseStatus::parse(&self.status).ok_or_else(|| {
            DbError::invalid_row("lease", format!("unknown status: {}", self.status))
        })?;
        Ok(Lease {
            id: parse_uuid("lease", &self.record_id)?,
            property_id: parse_uuid("lease", &self.property_id)?,
            tenant_id: parse_uuid("lease", &self.tenant_id)?,
            unit_number: self.unit_number,
            rent: self.rent,
            start_date: parse_date("lease", &self.start_date)?,
            end_date: self
                .end_date
                .as_deref()
                .map(|d| parse_date("lease", d))
                .transpose()?,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Lease repository.
#[derive(Clone)]
pub struct SurrealLeaseRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealLeaseRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn write(&self, statement: &str, id: Uuid, input: LeaseFields) -> Result<(), DbError> {
        let unit_number = input
            .unit_number
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());

        self.db
            .query(statement)
            .bind(("id", id.to_string()))
            .bind(("property_id", input.property_id.to_string()))
            .bind(("tenant_id", input.tenant_id.to_string()))
            .bind(("unit_number", unit_number))
            .bind(("rent", input.rent))
            .bind(("start_date", format_date(input.start_date)))
            .bind(("end_date", input.end_date.map(format_date)))
            .bind(("status", input.status.as_str().to_string()))
            .await?
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;
        Ok(())
    }

    fn collect(rows: Vec<LeaseRow>) -> Result<Vec<Lease>, DbError> {
        rows.into_iter().map(LeaseRow::try_into_lease).collect()
    }
}

impl<C: Connection> LeaseRepository for SurrealLeaseRepository<C> {
    async fn create(&self, input: LeaseFields) -> RentRollResult<Lease> {
        let id = Uuid::now_v7();
        self.write(
            "CREATE type::record('lease', $id) SET \
             property_id = $property_id, tenant_id = $tenant_id, \
             unit_number = $unit_number, rent = $rent, \
             start_date = $start_date, end_date = $end_date, \
             status = $status",
            id,
            input,
        )
        .await?;
        self.get_by_id(id).await
    }

    async fn get_by_id(&self, id: Uuid) -> RentRollResult<Lease> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * FROM type::record('lease', $id)")
            .bind(("id", id_str.clone()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeaseRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "lease".into(),
            id: id_str,
        })?;

        Ok(row.try_into_lease()?)
    }

    async fn update(&self, id: Uuid, input: LeaseFields) -> RentRollResult<Lease> {
        self.get_by_id(id).await?;
        self.write(
            "UPDATE type::record('lease', $id) SET \
             property_id = $property_id, tenant_id = $tenant_id, \
             unit_number = $unit_number, rent = $rent, \
             start_date = $start_date, end_date = $end_date, \
             status = $status, updated_at = time::now()",
            id,
            input,
        )
        .await?;
        self.get_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> RentRollResult<()> {
        self.get_by_id(id).await?;

        self.db
            .query("DELETE type::record('lease', $id)")
            .bind(("id", id.to_string()))
            .await
            .map_err(DbError::from)?;

        Ok(())
    }

    async fn list(&self, property_id: Option<Uuid>) -> RentRollResult<Vec<Lease>> {
        let mut result = match property_id {
            Some(property_id) => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM lease \
                     WHERE property_id = $property_id \
                     ORDER BY start_date DESC, created_at ASC",
                )
                .bind(("property_id", property_id.to_string()))
                .await
                .map_err(DbError::from)?,
            None => self
                .db
                .query(
                    "SELECT meta::id(id) AS record_id, * FROM lease \
                     ORDER BY start_date DESC, created_at ASC",
                )
                .await
                .map_err(DbError::from)?,
        };

        let rows: Vec<LeaseRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect(rows)?)
    }

    async fn find_by_unit(
        &self,
        property_id: Uuid,
        unit_number: &str,
    ) -> RentRollResult<Option<Lease>> {
        let mut result = self
            .db
            .query(
                "SELECT meta::id(id) AS record_id, * FROM lease \
                 WHERE property_id = $property_id AND unit_number = $unit_number \
                 ORDER BY created_at ASC LIMIT 1",
            )
            .bind(("property_id", property_id.to_string()))
            .bind(("unit_number", unit_number.trim().to_string()))
            .await
            .map_err(DbError::from)?;

        let rows: Vec<LeaseRow> = result.take(0).map_err(DbError::from)?;
        Ok(Self::collect(rows)?.into_iter().next())
    }

    async fn count(&self) -> RentRollResult<u64> {
        let mut result = self
            .db
            .query("SELECT count() AS total FROM lease GROUP ALL")
            .await
            .map_err(DbError::from)?;
        let rows: Vec<CountRow> = result.take(0).map_err(DbError::from)?;
        Ok(first_count(rows))
    }
}
