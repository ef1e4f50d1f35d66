use axum::extract::State;
use axum::routing::get;
use axum::{Extension, Router};
use chrono::Utc;
use maud::Markup;
use rentroll_core::dashboard::{DashboardSummary, previous_month, rent_by_property};
use rentroll_core::repository::{LeaseRepository, PropertyRepository, TenantRepository};
use tower_cookies::Cookies;

use super::page;
use crate::error::AppResult;
use crate::session::CurrentUser;
use crate::state::AppState;
use crate::views;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}

async fn index(
    State(state): State<AppState>,
    current: Extension<CurrentUser>,
    cookies: Cookies,
) -> AppResult<Markup> {
    let today = Utc::now().date_naive();
    let properties = state.properties.list().await?;
    let leases = state.leases.list(None).await?;

    let summary = DashboardSummary {
        property_count: state.properties.count().await?,
        tenant_count: state.tenants.count().await?,
        lease_count: state.leases.count().await?,
        period: previous_month(today),
        rows: rent_by_property(&properties, &leases, today),
    };

    Ok(views::dashboard::dashboard(
        page("Dashboard", &current, &cookies),
        &summary,
    ))
}
