//! Demo data for development and screenshots.

use chrono::{Datelike, Duration, NaiveDate, Utc};
use rand::Rng;
use rand::seq::IndexedRandom;
use rentroll_core::error::RentRollResult;
use rentroll_core::models::lease::{LeaseFields, LeaseStatus};
use rentroll_core::models::property::PropertyFields;
use rentroll_core::models::tenant::{Tenant, TenantFields, TenantKind};
use rentroll_core::repository::{LeaseRepository, PropertyRepository, TenantRepository};
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;
use crate::repository::{
    SurrealLeaseRepository, SurrealPropertyRepository, SurrealTenantRepository,
};

const PROPERTIES: &[(&str, &str, &str)] = &[
    ("Sunlight Tower", "1-2-3 Chuo, Tokyo", "5 minutes from the station"),
    ("Bellevue Garden", "4-5-6 Setagaya, Tokyo", "Low-rise, family oriented"),
    ("Green Park Hills", "7-8-9 Aoba, Yokohama", "Parking and bicycle storage"),
    ("Cosmo Residence", "1-9-5 Funabashi, Chiba", "Office units on the ground floor"),
    ("Breeze Heights", "3-4-7 Minami, Saitama", "Quiet residential street"),
    ("Metro City Shinjuku", "5-6-2 Shinjuku, Tokyo", "24 hour concierge"),
    ("Riverside Sakuragawa", "8-1-11 Sumida, Tokyo", "River view"),
    ("Seaside Lagoon", "2-3-8 Fujisawa, Kanagawa", "3 minutes walk to the beach"),
];

const UNITS: &[&str] = &["101", "102", "201", "202", "301", "302"];

/// Leases are generated one per month, going back this many months.
const LEASE_MONTHS: u32 = 24;

/// What [`seed_data`] inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub properties: usize,
    pub tenants: usize,
    pub leases: usize,
    /// Properties already existed and no reset was requested.
    pub skipped: bool,
}

fn month_start(reference: NaiveDate, months_ago: u32) -> NaiveDate {
    let total = reference.year() * 12 + reference.month0() as i32 - months_ago as i32;
    NaiveDate::from_ymd_opt(total.div_euclid(12), total.rem_euclid(12) as u32 + 1, 1)
        .unwrap_or(reference)
}

/// Populate the database with demo properties, tenants and leases.
///
/// With `with_reset` all leases, tenants and properties are deleted first.
/// Without it, nothing happens when any property already exists.
pub async fn seed_data<C: Connection>(
    db: &Surreal<C>,
    with_reset: bool,
) -> RentRollResult<SeedReport> {
    let properties = SurrealPropertyRepository::new(db.clone());
    let tenants = SurrealTenantRepository::new(db.clone());
    let leases = SurrealLeaseRepository::new(db.clone());

    if with_reset {
        info!("Resetting property data");
        db.query(
            "BEGIN TRANSACTION; \
             DELETE lease; DELETE tenant; DELETE property; \
             COMMIT TRANSACTION;",
        )
        .await
        .map_err(DbError::from)?
        .check()
        .map_err(|e| DbError::Query(format!("reset failed: {e}")))?;
    } else if properties.count().await? > 0 {
        info!("Properties exist, skipping seed");
        return Ok(SeedReport {
            skipped: true,
            ..SeedReport::default()
        });
    }

    let mut report = SeedReport::default();
    let mut occupants: Vec<Tenant> = Vec::new();

    for (name, address, note) in PROPERTIES {
        let property = properties
            .create(PropertyFields {
                name: (*name).into(),
                address: (*address).into(),
                note: Some((*note).into()),
            })
            .await?;
        report.properties += 1;

        for unit in UNITS {
            let n = occupants.len() + 1;
            let phone = {
                let mut rng = rand::rng();
                format!(
                    "090-{}-{}",
                    rng.random_range(1000..=9999),
                    rng.random_range(1000..=9999)
                )
            };
            let tenant = tenants
                .create(TenantFields {
                    name: format!("Tenant {n:03}"),
                    email: Some(format!("tenant{n:03}@example.com")),
                    phone: Some(phone),
                    property_id: Some(property.id),
                    unit_number: Some((*unit).into()),
                    kind: TenantKind::Occupant,
                })
                .await?;
            occupants.push(tenant);
        }
    }
    report.tenants = occupants.len();

    let today = Utc::now().date_naive();
    for months_ago in (0..=LEASE_MONTHS).rev() {
        let start_date = month_start(today, months_ago);
        // The thread-local rng is not Send, so keep it out of the awaits.
        let fields = {
            let mut rng = rand::rng();
            let Some(tenant) = occupants.choose(&mut rng) else {
                break;
            };
            let Some(property_id) = tenant.property_id else {
                continue;
            };
            let status = LeaseStatus::ALL
                .choose(&mut rng)
                .copied()
                .unwrap_or_default();
            LeaseFields {
                property_id,
                tenant_id: tenant.id,
                unit_number: tenant.unit_number.clone(),
                rent: rng.random_range(7..=18) * 10_000,
                start_date,
                end_date: rng
                    .random_bool(0.3)
                    .then(|| start_date + Duration::days(330)),
                status,
            }
        };
        leases.create(fields).await?;
        report.leases += 1;
    }

    info!(
        properties = report.properties,
        tenants = report.tenants,
        leases = report.leases,
        "Seed data inserted"
    );
    Ok(report)
}
