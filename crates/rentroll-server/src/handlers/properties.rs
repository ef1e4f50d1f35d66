//! Property list with its create/edit form, plus cascading delete.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Router};
use rentroll_core::registrar::{RegistrarOutcome, upsert_property};
use rentroll_core::repository::PropertyRepository;
use tower_cookies::Cookies;
use tracing::info;

use super::page;
use crate::error::AppResult;
use crate::flash::{self, Level};
use crate::forms::{DeletePropertyForm, FieldErrors, PropertyForm, PropertyQuery, optional_id};
use crate::session::{CurrentUser, csrf_ok};
use crate::state::AppState;
use crate::views::{self, properties::PropertiesView};

const LIST: &str = "/properties";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/properties", get(list).post(save))
        .route("/properties/delete", post(delete))
}

async fn render(
    state: &AppState,
    current: &Extension<CurrentUser>,
    cookies: &Cookies,
    form: PropertyForm,
    errors: FieldErrors,
    status: StatusCode,
) -> AppResult<Response> {
    let properties = state.properties.list().await?;
    let editing = !form.property_id.trim().is_empty();
    let title = if editing { "Edit property" } else { "Properties" };

    let markup = views::properties::properties(
        page(title, current, cookies),
        PropertiesView {
            properties: &properties,
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
    Query(query): Query<PropertyQuery>,
) -> AppResult<Response> {
    let mut form = PropertyForm::default();
    if let Ok(Some(id)) = optional_id(query.property_id.as_deref().unwrap_or_default()) {
        match state.properties.get_by_id(id).await {
            Ok(property) => form = PropertyForm::from_property(&property),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }
    }
    render(&state, &current, &cookies, form, FieldErrors::default(), StatusCode::OK).await
}

async fn save(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<PropertyForm>,
) -> AppResult<Response> {
    if !csrf_ok(&state, &current, &cookies, &form.csrf_token) {
        return Ok(Redirect::to(LIST).into_response());
    }

    let (target, fields) = match form.validate() {
        Ok(valid) => valid,
        Err(errors) => {
            return render(
                &state,
                &current,
                &cookies,
                form,
                errors,
                StatusCode::UNPROCESSABLE_ENTITY,
            )
            .await;
        }
    };

    match upsert_property(&state.properties, target, fields).await {
        Ok(RegistrarOutcome::Created(property)) => {
            info!(property_id = %property.id, "Property registered");
            flash::push(&cookies, Level::Success, "Property registered.");
        }
        Ok(RegistrarOutcome::Updated(property)) => {
            info!(property_id = %property.id, "Property updated");
            flash::push(&cookies, Level::Success, "Property updated.");
        }
        Err(e) if e.is_not_found() => {
            flash::push(&cookies, Level::Danger, "That property no longer exists.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(LIST).into_response())
}

async fn delete(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
    Form(form): Form<DeletePropertyForm>,
) -> AppResult<Redirect> {
    if !csrf_ok(&state, &current, &cookies, &form.csrf_token) {
        return Ok(Redirect::to(LIST));
    }

    let Ok(Some(id)) = optional_id(&form.property_id) else {
        flash::push(&cookies, Level::Danger, "The property to delete is invalid.");
        return Ok(Redirect::to(LIST));
    };

    match state.properties.delete(id).await {
        Ok(()) => {
            info!(property_id = %id, "Property deleted");
            flash::push(
                &cookies,
                Level::Info,
                "Property deleted along with its tenants and leases.",
            );
        }
        Err(e) if e.is_not_found() => {
            flash::push(&cookies, Level::Danger, "That property no longer exists.");
        }
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(LIST))
}
