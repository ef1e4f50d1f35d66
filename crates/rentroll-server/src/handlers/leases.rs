//! Lease list with vacancy rows, and the lease form.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Extension, Form, Router};
use chrono::Utc;
use rentroll_core::leasing::{LeaseOutcome, save_lease};
use rentroll_core::ledger::{build_lease_rows, unit_choices};
use rentroll_core::models::lease::{Lease, LeaseStatus};
use rentroll_core::models::property::Property;
use rentroll_core::models::tenant::Tenant;
use rentroll_core::rent;
use rentroll_core::repository::{LeaseRepository, PropertyRepository, TenantRepository};
use tower_cookies::Cookies;
use tracing::info;
use uuid::Uuid;

use super::page;
use super::tenants::select_property;
use crate::error::AppResult;
use crate::flash::{self, Flash, Level};
use crate::forms::{FieldErrors, LeaseForm, LeaseQuery, optional_id};
use crate::session::{CurrentUser, csrf_ok};
use crate::state::AppState;
use crate::views::{self, leases::LeasesView};

pub fn router() -> Router<AppState> {
    Router::new().route("/leases", get(list).post(save))
}

fn list_path(property_id: Uuid) -> String {
    format!("/leases?property_id={property_id}")
}

fn form_from_lease(lease: &Lease) -> LeaseForm {
    LeaseForm {
        lease_id: lease.id.to_string(),
        property_id: lease.property_id.to_string(),
        unit_number: lease.unit_number.clone().unwrap_or_default(),
        tenant_id: lease.tenant_id.to_string(),
        rent: rent::to_display(lease.rent),
        start_date: lease.start_date.format("%Y-%m-%d").to_string(),
        end_date: lease
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        status: lease.status.as_str().to_string(),
        csrf_token: String::new(),
    }
}

fn blank_form() -> LeaseForm {
    LeaseForm {
        start_date: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        status: LeaseStatus::default().as_str().to_string(),
        ..LeaseForm::default()
    }
}

#[allow(clippy::too_many_arguments)]
async fn render(
    state: &AppState,
    current: &Extension<CurrentUser>,
    cookies: &Cookies,
    properties: Vec<Property>,
    tenants: Vec<Tenant>,
    selected_property: Option<Uuid>,
    mut form: LeaseForm,
    errors: FieldErrors,
    status: StatusCode,
) -> AppResult<Response> {
    let leases = state.leases.list(selected_property).await?;
    let rows = build_lease_rows(leases, &tenants, &properties, selected_property);

    let mut units = unit_choices(&tenants, selected_property);
    let unit = form.unit_number.trim().to_string();
    if !unit.is_empty() && !units.contains(&unit) {
        units.push(unit);
    }
    if form.property_id.is_empty() {
        form.property_id = selected_property
            .map(|id| id.to_string())
            .unwrap_or_default();
    }
    let candidates: Vec<Tenant> = tenants
        .into_iter()
        .filter(|t| !t.is_vacancy_marker() && t.property_id == selected_property)
        .collect();

    let editing = !form.lease_id.trim().is_empty();
    let mut page = page(
        if editing { "Edit lease" } else { "Leases" },
        current,
        cookies,
    );
    if properties.is_empty() || candidates.is_empty() {
        page.flashes.push(Flash::new(
            Level::Info,
            "Register a property and its tenants before adding leases.",
        ));
    }

    let markup = views::leases::leases(
        page,
        LeasesView {
            properties: &properties,
            tenants: &candidates,
            rows: &rows,
            units: &units,
            selected_property,
            form: &form,
            errors: &errors,
            editing,
            csrf_token: current.csrf_token(),
        },
    );
    Ok((status, markup).into_response())
}

async fn list(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Query(query): Query<LeaseQuery>,
) -> AppResult<Response> {
    let properties = state.properties.list().await?;
    let tenants = state.tenants.list(None).await?;

    let mut form = blank_form();
    let mut requested = optional_id(query.property_id.as_deref().unwrap_or_default())
        .ok()
        .flatten();
    if let Ok(Some(id)) = optional_id(query.lease_id.as_deref().unwrap_or_default()) {
        match state.leases.get_by_id(id).await {
            Ok(lease) => {
                requested = Some(lease.property_id);
                form = form_from_lease(&lease);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }
    let selected = select_property(&properties, requested);

    render(
        &state,
        &current,
        &cookies,
        properties,
        tenants,
        selected,
        form,
        FieldErrors::default(),
        StatusCode::OK,
    )
    .await
}

async fn save(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<LeaseForm>,
) -> AppResult<Response> {
    let properties = state.properties.list().await?;
    let tenants = state.tenants.list(None).await?;
    if properties.is_empty() || tenants.is_empty() {
        flash::push(
            &cookies,
            Level::Warning,
            "Register a property and a tenant before adding a lease.",
        );
        return Ok(Redirect::to("/leases").into_response());
    }

    if !csrf_ok(&state, &current, &cookies, &form.csrf_token) {
        return Ok(Redirect::to("/leases").into_response());
    }

    let known_properties: Vec<Uuid> = properties.iter().map(|p| p.id).collect();
    // Vacancy markers are not lessees.
    let known_tenants: Vec<Uuid> = tenants
        .iter()
        .filter(|t| !t.is_vacancy_marker())
        .map(|t| t.id)
        .collect();
    let (target, fields) = match form.validate(&known_properties, &known_tenants) {
        Ok(valid) => valid,
        Err(errors) => {
            let requested = optional_id(&form.property_id).ok().flatten();
            let selected = select_property(&properties, requested);
            return render(
                &state,
                &current,
                &cookies,
                properties,
                tenants,
                selected,
                form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };
    let property_id = fields.property_id;

    match save_lease(&state.leases, target, fields).await {
        Ok(LeaseOutcome::Created(lease)) => {
            info!(lease_id = %lease.id, "Lease registered");
            flash::push(&cookies, Level::Success, "Lease registered.");
        }
        Ok(LeaseOutcome::Updated(lease)) => {
            info!(lease_id = %lease.id, "Lease updated");
            flash::push(&cookies, Level::Success, "Lease updated.");
        }
        Err(e) if e.is_not_found() => {
            flash::push(&cookies, Level::Danger, "That lease no longer exists.");
            return Ok(Redirect::to("/leases").into_response());
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(&list_path(property_id)).into_response())
}
