//! HTTP tests driving the full router against an in-memory database.

use axum::http::StatusCode;
use axum_test::{TestResponse, TestServer};
use rentroll_core::models::tenant::TenantKind;
use rentroll_core::repository::{
    LeaseRepository, PropertyRepository, TenantRepository, UserRepository,
};
use rentroll_db::repository::{
    SurrealLeaseRepository, SurrealPropertyRepository, SurrealTenantRepository,
    SurrealUserRepository,
};
use rentroll_server::{AppState, ServerConfig, app};
use surrealdb::Surreal;
use surrealdb::engine::any::{self, Any};
use uuid::Uuid;

struct Harness {
    server: TestServer,
    properties: SurrealPropertyRepository<Any>,
    tenants: SurrealTenantRepository<Any>,
    leases: SurrealLeaseRepository<Any>,
    users: SurrealUserRepository<Any>,
}

async fn setup() -> Harness {
    let db: Surreal<Any> = any::connect("mem://").await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    rentroll_db::run_migrations(&db).await.unwrap();

    let state = AppState::new(db.clone(), &ServerConfig::default());
    let server = TestServer::builder()
        .save_cookies()
        .build(app(state))
        .unwrap();

    Harness {
        server,
        properties: SurrealPropertyRepository::new(db.clone()),
        tenants: SurrealTenantRepository::new(db.clone()),
        leases: SurrealLeaseRepository::new(db.clone()),
        users: SurrealUserRepository::new(db),
    }
}

fn location(response: &TestResponse) -> String {
    response
        .header("location")
        .to_str()
        .unwrap()
        .to_string()
}

fn csrf_token(html: &str) -> String {
    let marker = r#"name="csrf_token" value=""#;
    let start = html.find(marker).expect("page has a csrf field") + marker.len();
    let end = start + html[start..].find('"').unwrap();
    html[start..end].to_string()
}

async fn register(server: &TestServer, email: &str) -> TestResponse {
    server
        .post("/auth/register")
        .form(&[
            ("email", email),
            ("password", "secret1"),
            ("confirm_password", "secret1"),
        ])
        .await
}

/// Register and log in, returning the session's CSRF token.
async fn sign_in(server: &TestServer) -> String {
    register(server, "staff@example.com")
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let page = server.get("/properties").await;
    page.assert_status_ok();
    csrf_token(&page.text())
}

async fn add_property(h: &Harness, csrf: &str, name: &str, address: &str) -> TestResponse {
    h.server
        .post("/properties")
        .form(&[
            ("csrf_token", csrf),
            ("name", name),
            ("address", address),
            ("note", ""),
        ])
        .await
}

async fn add_tenant(h: &Harness, csrf: &str, property_id: Uuid, unit: &str, name: &str, kind: TenantKind) -> Uuid {
    let property_id = property_id.to_string();
    let email = match kind {
        TenantKind::Occupant => format!("{}@example.com", name.to_lowercase()),
        TenantKind::VacancyMarker => String::new(),
    };
    h.server
        .post("/tenants")
        .form(&[
            ("csrf_token", csrf),
            ("property_id", property_id.as_str()),
            ("unit_number", unit),
            ("name", name),
            ("email", email.as_str()),
            ("kind", kind.as_str()),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);

    h.tenants
        .list(None)
        .await
        .unwrap()
        .into_iter()
        .find(|t| t.name == name && t.unit() == Some(unit))
        .map(|t| t.id)
        .unwrap()
}

async fn add_lease(h: &Harness, csrf: &str, property_id: Uuid, unit: &str, tenant_id: Uuid, rent: &str) -> TestResponse {
    let property_id = property_id.to_string();
    let tenant_id = tenant_id.to_string();
    h.server
        .post("/leases")
        .form(&[
            ("csrf_token", csrf),
            ("property_id", property_id.as_str()),
            ("unit_number", unit),
            ("tenant_id", tenant_id.as_str()),
            ("rent", rent),
            ("start_date", "2024-04-01"),
            ("end_date", ""),
            ("status", "active"),
        ])
        .await
}

async fn only_property(h: &Harness) -> Uuid {
    let properties = h.properties.list().await.unwrap();
    assert_eq!(properties.len(), 1);
    properties[0].id
}

#[tokio::test]
async fn health_is_public() {
    let h = setup().await;
    let response = h.server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn management_pages_redirect_to_login() {
    let h = setup().await;

    let response = h.server.get("/properties").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/auth/login?next=%2Fproperties");

    let response = h.server.get("/").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert!(location(&response).starts_with("/auth/login?next="));
}

#[tokio::test]
async fn login_follows_local_next_only() {
    let h = setup().await;
    sign_in(&h.server).await;
    h.server.get("/auth/logout").await.assert_status(StatusCode::SEE_OTHER);
    h.server.get("/").await.assert_status(StatusCode::SEE_OTHER);

    let bad = h
        .server
        .post("/auth/login")
        .form(&[("email", "staff@example.com"), ("password", "wrong-password")])
        .await;
    bad.assert_status(StatusCode::UNAUTHORIZED);
    assert!(bad.text().contains("Invalid email or password."));

    let response = h
        .server
        .post("/auth/login")
        .add_query_param("next", "/leases")
        .form(&[("email", "Staff@Example.com"), ("password", "secret1")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/leases");
    h.server.get("/leases").await.assert_status_ok();

    h.server.get("/auth/logout").await;
    let response = h
        .server
        .post("/auth/login")
        .add_query_param("next", "//evil.example")
        .form(&[("email", "staff@example.com"), ("password", "secret1")])
        .await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn signed_in_users_skip_login_and_register_posts() {
    let h = setup().await;
    sign_in(&h.server).await;

    let response = h
        .server
        .post("/auth/login")
        .add_query_param("next", "/leases")
        .form(&[("email", "staff@example.com"), ("password", "wrong-password")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");

    let response = register(&h.server, "second@example.com").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    let lookup = h.users.get_by_email("second@example.com").await;
    assert!(lookup.unwrap_err().is_not_found());
}

#[tokio::test]
async fn duplicate_registration_warns() {
    let h = setup().await;
    sign_in(&h.server).await;
    h.server.get("/auth/logout").await;

    let response = register(&h.server, "STAFF@example.com").await;
    response.assert_status(StatusCode::CONFLICT);
    assert!(response.text().contains("This email is already registered."));
}

#[tokio::test]
async fn registration_errors_are_shown_per_field() {
    let h = setup().await;
    let response = h
        .server
        .post("/auth/register")
        .form(&[
            ("email", "not-an-email"),
            ("password", "secret1"),
            ("confirm_password", "secret2"),
        ])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Enter a valid email address."));
    assert!(html.contains("Passwords do not match."));
}

#[tokio::test]
async fn property_names_merge_case_insensitively() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;

    let first = add_property(&h, &csrf, "HQ", "1 Main St").await;
    first.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&first), "/properties");
    add_property(&h, &csrf, "hq", "2 Main St").await;
    add_property(&h, &csrf, " HQ ", "3 Main St").await;

    let properties = h.properties.list().await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "HQ");
    assert_eq!(properties[0].address, "3 Main St");

    let page = h.server.get("/properties").await;
    assert!(page.text().contains("Property updated."));

    // Editing the survivor keeps a single row.
    let id = properties[0].id.to_string();
    h.server
        .post("/properties")
        .form(&[
            ("csrf_token", csrf.as_str()),
            ("property_id", id.as_str()),
            ("name", "Headquarters"),
            ("address", "3 Main St"),
        ])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let properties = h.properties.list().await.unwrap();
    assert_eq!(properties.len(), 1);
    assert_eq!(properties[0].name, "Headquarters");
}

#[tokio::test]
async fn invalid_property_form_is_redisplayed() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;

    let response = add_property(&h, &csrf, "  ", "").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Name is required."));
    assert!(html.contains("Address is required."));
    assert_eq!(h.properties.count().await.unwrap(), 0);

    let response = h
        .server
        .post("/properties")
        .form(&[
            ("csrf_token", csrf.as_str()),
            ("property_id", "not-a-uuid"),
            ("name", "HQ"),
            ("address", "1 Main St"),
        ])
        .await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.properties.count().await.unwrap(), 0);
}

#[tokio::test]
async fn csrf_mismatch_changes_nothing() {
    let h = setup().await;
    sign_in(&h.server).await;

    let response = add_property(&h, "forged", "HQ", "1 Main St").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(h.properties.count().await.unwrap(), 0);

    let page = h.server.get("/properties").await;
    assert!(page.text().contains("Your form expired. Please try again."));
}

#[tokio::test]
async fn lease_rent_is_scaled_and_units_hold_one_lease() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    let alice = add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;
    let bob = add_tenant(&h, &csrf, property_id, "101", "Bob", TenantKind::Occupant).await;

    let response = add_lease(&h, &csrf, property_id, "101", alice, "12.3").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), format!("/leases?property_id={property_id}"));

    let leases = h.leases.list(None).await.unwrap();
    assert_eq!(leases.len(), 1);
    assert_eq!(leases[0].rent, 123_000);

    add_lease(&h, &csrf, property_id, "101", bob, "15").await;
    let leases = h.leases.list(None).await.unwrap();
    assert_eq!(leases.len(), 1);
    assert_eq!(leases[0].tenant_id, bob);
    assert_eq!(leases[0].rent, 150_000);

    let page = h.server.get(&format!("/leases?lease_id={}", leases[0].id)).await;
    page.assert_status_ok();
    assert!(page.text().contains(r#"value="15.0""#));
}

#[tokio::test]
async fn bad_lease_fields_are_reported() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;

    let response = add_lease(&h, &csrf, property_id, "101", Uuid::now_v7(), "abc").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let html = response.text();
    assert!(html.contains("Rent must be a number."));
    assert!(html.contains("Choose a valid tenant."));
    assert_eq!(h.leases.count().await.unwrap(), 0);
}

#[tokio::test]
async fn vacancy_marker_cannot_hold_a_lease() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;
    let marker = add_tenant(&h, &csrf, property_id, "102", "vacant", TenantKind::VacancyMarker).await;

    let response = add_lease(&h, &csrf, property_id, "102", marker, "10").await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.text().contains("Choose a valid tenant."));
    assert_eq!(h.leases.count().await.unwrap(), 0);
}

#[tokio::test]
async fn lease_form_needs_properties_and_tenants() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;

    let response = add_lease(&h, &csrf, Uuid::now_v7(), "101", Uuid::now_v7(), "10").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/leases");
    let page = h.server.get("/leases").await;
    assert!(page.text().contains("Register a property and a tenant before adding a lease."));
}

#[tokio::test]
async fn vacancy_markers_show_until_a_lease_covers_the_unit() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    let alice = add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;
    add_tenant(&h, &csrf, property_id, "102", "vacant", TenantKind::VacancyMarker).await;

    let path = format!("/leases?property_id={property_id}");
    let html = h.server.get(&path).await.text();
    assert_eq!(html.matches(r#"<tr class="vacancy">"#).count(), 1);

    add_lease(&h, &csrf, property_id, "102", alice, "9.5").await;
    let html = h.server.get(&path).await.text();
    assert_eq!(html.matches(r#"<tr class="vacancy">"#).count(), 0);
}

#[tokio::test]
async fn deleting_a_property_cascades() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    let alice = add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;
    add_lease(&h, &csrf, property_id, "101", alice, "10").await;

    let id = property_id.to_string();
    let response = h
        .server
        .post("/properties/delete")
        .form(&[("csrf_token", csrf.as_str()), ("property_id", id.as_str())])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    assert_eq!(h.properties.count().await.unwrap(), 0);
    assert_eq!(h.tenants.count().await.unwrap(), 0);
    assert_eq!(h.leases.count().await.unwrap(), 0);

    let again = h
        .server
        .post("/properties/delete")
        .form(&[("csrf_token", csrf.as_str()), ("property_id", id.as_str())])
        .await;
    again.assert_status(StatusCode::SEE_OTHER);
    let page = h.server.get("/properties").await;
    assert!(page.text().contains("That property no longer exists."));
}

#[tokio::test]
async fn tenant_delete_from_lease_list_returns_there() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    let alice = add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;
    add_lease(&h, &csrf, property_id, "101", alice, "10").await;

    let next = format!("/leases?property_id={property_id}");
    let id = alice.to_string();
    let response = h
        .server
        .post(&format!("/leases/{alice}/delete"))
        .form(&[
            ("csrf_token", csrf.as_str()),
            ("tenant_id", id.as_str()),
            ("next_url", next.as_str()),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), next);
    assert_eq!(h.tenants.count().await.unwrap(), 0);
    assert_eq!(h.leases.count().await.unwrap(), 0);
}

#[tokio::test]
async fn tenant_delete_requires_matching_ids() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;
    let property_id = only_property(&h).await;
    let alice = add_tenant(&h, &csrf, property_id, "101", "Alice", TenantKind::Occupant).await;

    let other = Uuid::now_v7().to_string();
    let response = h
        .server
        .post(&format!("/tenants/{alice}/delete"))
        .form(&[
            ("csrf_token", csrf.as_str()),
            ("tenant_id", other.as_str()),
            ("next_url", "https://evil.example/"),
        ])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/tenants");
    assert_eq!(h.tenants.count().await.unwrap(), 1);
}

#[tokio::test]
async fn dashboard_shows_counts() {
    let h = setup().await;
    let csrf = sign_in(&h.server).await;
    add_property(&h, &csrf, "HQ", "1 Main St").await;

    let response = h.server.get("/").await;
    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Rent by property"));
    assert!(html.contains("no data"));
}
