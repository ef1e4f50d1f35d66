//! rentroll server: axum routes, maud pages and the login gate.

pub mod config;
pub mod error;
pub mod flash;
pub mod forms;
pub mod handlers;
pub mod session;
pub mod state;
pub mod views;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use state::AppState;

/// Build the application router.
///
/// Management pages sit behind [`session::require_login`]; the auth pages
/// and `/health` do not.
pub fn app(state: AppState) -> Router {
    let protected = Router::new()
        .merge(handlers::dashboard::router())
        .merge(handlers::properties::router())
        .merge(handlers::tenants::router())
        .merge(handlers::leases::router())
        .route_layer(from_fn_with_state(state.clone(), session::require_login));

    Router::new()
        .merge(protected)
        .merge(handlers::auth::router())
        .merge(handlers::health::router())
        .with_state(state)
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}
