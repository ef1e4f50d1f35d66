//! Tenant list filtered by property, its create/edit form, and tenant delete.
//!
//! The delete route is also mounted under `/leases/{id}/delete`: the lease
//! list offers removing the tenant behind a row.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use rentroll_core::ledger::sort_tenants;
use rentroll_core::models::property::Property;
use rentroll_core::models::tenant::Tenant;
use rentroll_core::repository::{PropertyRepository, TenantRepository};
use tower_cookies::Cookies;
use tracing::info;
use uuid::Uuid;

use super::page;
use crate::error::AppResult;
use crate::flash::{self, Flash, Level};
use crate::forms::{DeleteTenantForm, FieldErrors, TenantForm, TenantQuery, optional_id};
use crate::session::{CurrentUser, csrf_ok, safe_next};
use crate::state::AppState;
use crate::views::{self, tenants::TenantsView};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tenants", get(list).post(save))
        .route("/tenants/{id}/delete", post(delete_from_tenants))
        .route("/leases/{id}/delete", post(delete_from_leases))
}

fn list_path(property_id: Option<Uuid>) -> String {
    match property_id {
        Some(id) => format!("/tenants?property_id={id}"),
        None => "/tenants".to_string(),
    }
}

/// The requested property when it exists, else the first by name.
pub(crate) fn select_property(properties: &[Property], requested: Option<Uuid>) -> Option<Uuid> {
    requested
        .filter(|id| properties.iter().any(|p| p.id == *id))
        .or_else(|| properties.first().map(|p| p.id))
}

fn form_from_tenant(tenant: &Tenant) -> TenantForm {
    TenantForm {
        tenant_id: tenant.id.to_string(),
        property_id: tenant.property_id.map(|id| id.to_string()).unwrap_or_default(),
        unit_number: tenant.unit_number.clone().unwrap_or_default(),
        name: tenant.name.clone(),
        email: tenant.email.clone().unwrap_or_default(),
        phone: tenant.phone.clone().unwrap_or_default(),
        kind: tenant.kind.as_str().to_string(),
        csrf_token: String::new(),
    }
}

#[allow(clippy::too_many_arguments)]
async fn render(
    state: &AppState,
    current: &Extension<CurrentUser>,
    cookies: &Cookies,
    properties: Vec<Property>,
    selected_property: Option<Uuid>,
    form: TenantForm,
    errors: FieldErrors,
    status: StatusCode,
) -> AppResult<Response> {
    let mut tenants = state.tenants.list(selected_property).await?;
    sort_tenants(&mut tenants, &properties);

    let editing = !form.tenant_id.trim().is_empty();
    let mut page = page(
        if editing { "Edit tenant" } else { "Tenants" },
        current,
        cookies,
    );
    if properties.is_empty() {
        page.flashes
            .push(Flash::new(Level::Warning, "Register a property first."));
    }

    let markup = views::tenants::tenants(
        page,
        TenantsView {
            properties: &properties,
            tenants: &tenants,
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
    Query(query): Query<TenantQuery>,
) -> AppResult<Response> {
    let properties = state.properties.list().await?;
    let requested = optional_id(query.property_id.as_deref().unwrap_or_default())
        .ok()
        .flatten();
    let mut selected = select_property(&properties, requested);

    let mut form = TenantForm::default();
    if let Ok(Some(id)) = optional_id(query.tenant_id.as_deref().unwrap_or_default()) {
        match state.tenants.get_by_id(id).await {
            Ok(tenant) => {
                if tenant.property_id.is_some() {
                    selected = tenant.property_id;
                }
                form = form_from_tenant(&tenant);
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }
    if form.property_id.is_empty() {
        form.property_id = selected.map(|id| id.to_string()).unwrap_or_default();
    }

    render(
        &state,
        &current,
        &cookies,
        properties,
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
    Form(form): Form<TenantForm>,
) -> AppResult<Response> {
    if !csrf_ok(&state, &current, &cookies, &form.csrf_token) {
        return Ok(Redirect::to("/tenants").into_response());
    }

    let properties = state.properties.list().await?;
    let known: Vec<Uuid> = properties.iter().map(|p| p.id).collect();

    let (target, fields) = match form.validate(&known) {
        Ok(valid) => valid,
        Err(errors) => {
            let requested = optional_id(&form.property_id).ok().flatten();
            let selected = select_property(&properties, requested);
            return render(
                &state,
                &current,
                &cookies,
                properties,
                selected,
                form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };
    let property_id = fields.property_id;

    match target {
        Some(id) => match state.tenants.update(id, fields).await {
            Ok(tenant) => {
                info!(tenant_id = %tenant.id, "Tenant updated");
                flash::push(&cookies, Level::Success, "Tenant updated.");
            }
            Err(e) if e.is_not_found() => {
                flash::push(&cookies, Level::Danger, "That tenant no longer exists.");
                return Ok(Redirect::to("/tenants").into_response());
            }
            Err(e) => return Err(e.into()),
        },
        None => {
            let tenant = state.tenants.create(fields).await?;
            info!(tenant_id = %tenant.id, "Tenant registered");
            flash::push(&cookies, Level::Success, "Tenant registered.");
        }
    }
    Ok(Redirect::to(&list_path(property_id)).into_response())
}

async fn delete_from_tenants(
    state: State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Path(id): Path<String>,
    Form(form): Form<DeleteTenantForm>,
) -> AppResult<Redirect> {
    delete_tenant(state, current, cookies, &id, form, "/tenants").await
}

async fn delete_from_leases(
    state: State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Path(id): Path<String>,
    Form(form): Form<DeleteTenantForm>,
) -> AppResult<Redirect> {
    delete_tenant(state, current, cookies, &id, form, "/leases").await
}

/// Remove a tenant and its leases, then go back to `next_url` when it is a
/// local path, else to `fallback`.
async fn delete_tenant(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    path_id: &str,
    form: DeleteTenantForm,
    fallback: &str,
) -> AppResult<Redirect> {
    let back = Redirect::to(safe_next(Some(form.next_url.as_str())).unwrap_or(fallback));

    if !csrf_ok(&state, &current, &cookies, &form.csrf_token) {
        return Ok(back);
    }

    let id = match (optional_id(path_id), optional_id(&form.tenant_id)) {
        (Ok(Some(path)), Ok(Some(submitted))) if path == submitted => path,
        _ => {
            flash::push(&cookies, Level::Danger, "The tenant to delete is invalid.");
            return Ok(back);
        }
    };

    match state.tenants.delete(id).await {
        Ok(()) => {
            info!(tenant_id = %id, "Tenant deleted");
            flash::push(&cookies, Level::Info, "Tenant and their leases deleted.");
        }
        Err(e) if e.is_not_found() => {
            flash::push(&cookies, Level::Danger, "That tenant no longer exists.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(back)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn property(name: &str) -> Property {
        Property {
            id: Uuid::now_v7(),
            name: name.into(),
            address: "1 Main St".into(),
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn selection_falls_back_to_first_property() {
        let properties = vec![property("Alpha"), property("Beta")];
        assert_eq!(
            select_property(&properties, Some(properties[1].id)),
            Some(properties[1].id)
        );
        assert_eq!(
            select_property(&properties, Some(Uuid::now_v7())),
            Some(properties[0].id)
        );
        assert_eq!(select_property(&properties, None), Some(properties[0].id));
        assert_eq!(select_property(&[], None), None);
    }
}
