//! Integration tests for Tenant and Lease repository implementations
//! using in-memory SurrealDB.

use chrono::NaiveDate;
use rentroll_core::leasing::{LeaseOutcome, save_lease};
use rentroll_core::models::lease::{LeaseFields, LeaseStatus};
use rentroll_core::models::property::{Property, PropertyFields};
use rentroll_core::models::tenant::{TenantFields, TenantKind};
use rentroll_core::repository::{LeaseRepository, PropertyRepository, TenantRepository};
use rentroll_db::repository::{
    SurrealLeaseRepository, SurrealPropertyRepository, SurrealTenantRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, Mem};
use uuid::Uuid;

struct Fixture {
    properties: SurrealPropertyRepository<Db>,
    tenants: SurrealTenantRepository<Db>,
    leases: SurrealLeaseRepository<Db>,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentroll_db::run_migrations(&db).await.unwrap();
    Fixture {
        properties: SurrealPropertyRepository::new(db.clone()),
        tenants: SurrealTenantRepository::new(db.clone()),
        leases: SurrealLeaseRepository::new(db),
    }
}

async fn property(fx: &Fixture, name: &str) -> Property {
    fx.properties
        .create(PropertyFields {
            name: name.into(),
            address: "1 Main St".into(),
            note: None,
        })
        .await
        .unwrap()
}

fn tenant(name: &str, property_id: Uuid, unit: Option<&str>, kind: TenantKind) -> TenantFields {
    TenantFields {
        name: name.into(),
        email: Some(format!("{}@example.com", name.to_lowercase())),
        phone: Some("  ".into()),
        property_id: Some(property_id),
        unit_number: unit.map(str::to_string),
        kind,
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn lease(property_id: Uuid, tenant_id: Uuid, unit: Option<&str>, start: &str) -> LeaseFields {
    LeaseFields {
        property_id,
        tenant_id,
        unit_number: unit.map(str::to_string),
        rent: 123_000,
        start_date: date(start),
        end_date: None,
        status: LeaseStatus::Pending,
    }
}

#[tokio::test]
async fn tenant_round_trips_all_fields() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;

    let created = fx
        .tenants
        .create(tenant("Alice", p.id, Some(" 101 "), TenantKind::Occupant))
        .await
        .unwrap();
    let fetched = fx.tenants.get_by_id(created.id).await.unwrap();

    assert_eq!(fetched.name, "Alice");
    assert_eq!(fetched.email.as_deref(), Some("alice@example.com"));
    assert_eq!(fetched.phone, None, "blank phone is stored as NONE");
    assert_eq!(fetched.property_id, Some(p.id));
    assert_eq!(fetched.unit(), Some("101"));
    assert_eq!(fetched.kind, TenantKind::Occupant);
}

#[tokio::test]
async fn vacancy_marker_kind_is_persisted() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;

    let marker = fx
        .tenants
        .create(tenant("vacant", p.id, Some("102"), TenantKind::VacancyMarker))
        .await
        .unwrap();
    assert!(fx.tenants.get_by_id(marker.id).await.unwrap().is_vacancy_marker());

    let mut occupied = tenant("Bob", p.id, Some("102"), TenantKind::Occupant);
    occupied.email = None;
    let updated = fx.tenants.update(marker.id, occupied).await.unwrap();
    assert!(!updated.is_vacancy_marker());
    assert_eq!(updated.name, "Bob");
}

#[tokio::test]
async fn tenant_list_filters_by_property() {
    let fx = setup().await;
    let a = property(&fx, "A").await;
    let b = property(&fx, "B").await;
    fx.tenants
        .create(tenant("Zed", a.id, Some("1"), TenantKind::Occupant))
        .await
        .unwrap();
    fx.tenants
        .create(tenant("Amy", a.id, Some("2"), TenantKind::Occupant))
        .await
        .unwrap();
    fx.tenants
        .create(tenant("Bea", b.id, Some("1"), TenantKind::Occupant))
        .await
        .unwrap();

    let names: Vec<String> = fx
        .tenants
        .list(Some(a.id))
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["Amy", "Zed"]);
    assert_eq!(fx.tenants.list(None).await.unwrap().len(), 3);
    assert_eq!(fx.tenants.count().await.unwrap(), 3);
}

#[tokio::test]
async fn deleting_tenant_cascades_to_leases() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;
    let alice = fx
        .tenants
        .create(tenant("Alice", p.id, Some("101"), TenantKind::Occupant))
        .await
        .unwrap();
    let bob = fx
        .tenants
        .create(tenant("Bob", p.id, Some("102"), TenantKind::Occupant))
        .await
        .unwrap();
    fx.leases
        .create(lease(p.id, alice.id, Some("101"), "2024-01-01"))
        .await
        .unwrap();
    let kept = fx
        .leases
        .create(lease(p.id, bob.id, Some("102"), "2024-01-01"))
        .await
        .unwrap();

    fx.tenants.delete(alice.id).await.unwrap();

    let remaining = fx.leases.list(None).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, kept.id);
    assert!(fx.tenants.delete(alice.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn lease_round_trips_dates_and_rent() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;
    let t = fx
        .tenants
        .create(tenant("Alice", p.id, Some("101"), TenantKind::Occupant))
        .await
        .unwrap();

    let mut fields = lease(p.id, t.id, Some("101"), "2024-02-29");
    fields.end_date = Some(date("2025-01-31"));
    fields.status = LeaseStatus::Active;
    let created = fx.leases.create(fields).await.unwrap();
    let fetched = fx.leases.get_by_id(created.id).await.unwrap();

    assert_eq!(fetched.rent, 123_000);
    assert_eq!(fetched.start_date, date("2024-02-29"));
    assert_eq!(fetched.end_date, Some(date("2025-01-31")));
    assert_eq!(fetched.status, LeaseStatus::Active);
    assert_eq!(fetched.unit(), Some("101"));
}

#[tokio::test]
async fn lease_list_is_newest_start_first_and_scoped() {
    let fx = setup().await;
    let a = property(&fx, "A").await;
    let b = property(&fx, "B").await;
    let t = fx
        .tenants
        .create(tenant("Alice", a.id, Some("1"), TenantKind::Occupant))
        .await
        .unwrap();
    fx.leases
        .create(lease(a.id, t.id, Some("1"), "2023-05-01"))
        .await
        .unwrap();
    fx.leases
        .create(lease(a.id, t.id, Some("2"), "2024-05-01"))
        .await
        .unwrap();
    fx.leases
        .create(lease(b.id, t.id, Some("1"), "2025-05-01"))
        .await
        .unwrap();

    let scoped = fx.leases.list(Some(a.id)).await.unwrap();
    let starts: Vec<NaiveDate> = scoped.iter().map(|l| l.start_date).collect();
    assert_eq!(starts, vec![date("2024-05-01"), date("2023-05-01")]);
    assert_eq!(fx.leases.list(None).await.unwrap()[0].property_id, b.id);
}

#[tokio::test]
async fn find_by_unit_matches_any_status() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;
    let t = fx
        .tenants
        .create(tenant("Alice", p.id, Some("101"), TenantKind::Occupant))
        .await
        .unwrap();
    let mut fields = lease(p.id, t.id, Some("101"), "2024-01-01");
    fields.status = LeaseStatus::Terminated;
    let created = fx.leases.create(fields).await.unwrap();

    let found = fx.leases.find_by_unit(p.id, "101").await.unwrap();
    assert_eq!(found.map(|l| l.id), Some(created.id));
    assert!(fx.leases.find_by_unit(p.id, "102").await.unwrap().is_none());
}

#[tokio::test]
async fn saving_lease_for_occupied_unit_overwrites_it() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;
    let alice = fx
        .tenants
        .create(tenant("Alice", p.id, Some("101"), TenantKind::Occupant))
        .await
        .unwrap();
    let bob = fx
        .tenants
        .create(tenant("Bob", p.id, Some("101"), TenantKind::Occupant))
        .await
        .unwrap();

    let first = save_lease(&fx.leases, None, lease(p.id, alice.id, Some("101"), "2024-01-01"))
        .await
        .unwrap();
    let second = save_lease(&fx.leases, None, lease(p.id, bob.id, Some("101"), "2024-06-01"))
        .await
        .unwrap();

    assert!(matches!(second, LeaseOutcome::Updated(_)));
    assert_eq!(second.lease().id, first.lease().id);
    assert_eq!(second.lease().tenant_id, bob.id);
    assert_eq!(fx.leases.count().await.unwrap(), 1);
}

#[tokio::test]
async fn updating_missing_lease_is_not_found() {
    let fx = setup().await;
    let p = property(&fx, "HQ").await;

    let err = fx
        .leases
        .update(Uuid::now_v7(), lease(p.id, Uuid::now_v7(), None, "2024-01-01"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}
