//! Login gate, session cookie and CSRF check.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use rentroll_auth::token;
use rentroll_core::error::RentRollError;
use rentroll_core::models::session::Session;
use rentroll_core::models::user::User;
use tower_cookies::cookie::SameSite;
use tower_cookies::cookie::time::Duration;
use tower_cookies::{Cookie, Cookies};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::AppError;
use crate::flash::{self, Level};
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "rentroll_session";

/// The signed-in staff member, inserted by [`require_login`].
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub session: Session,
}

impl CurrentUser {
    pub fn csrf_token(&self) -> &str {
        &self.session.csrf_token
    }
}

pub fn set_session_cookie(cookies: &Cookies, token: String, lifetime_secs: u64) {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(Duration::seconds(lifetime_secs as i64));
    cookies.add(cookie);
}

pub fn clear_session_cookie(cookies: &Cookies) {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);
}

pub fn session_token(cookies: &Cookies) -> Option<String> {
    cookies
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// `/auth/login?next=<current path and query>`.
pub fn login_redirect(path_and_query: &str) -> Redirect {
    let query: String = form_urlencoded::Serializer::new(String::new())
        .append_pair("next", path_and_query)
        .finish();
    Redirect::to(&format!("/auth/login?{query}"))
}

/// Only same-site paths are followed after login.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| n.starts_with('/') && !n.starts_with("//") && !n.contains('\\'))
}

/// Middleware for every page behind the login wall.
pub async fn require_login(
    State(state): State<AppState>,
    cookies: Cookies,
    mut req: Request,
    next: Next,
) -> Response {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| "/".into());

    let Some(token) = session_token(&cookies) else {
        return login_redirect(&target).into_response();
    };

    match state.auth.authenticate(&token).await {
        Ok((user, session)) => {
            req.extensions_mut().insert(CurrentUser { user, session });
            next.run(req).await
        }
        Err(RentRollError::AuthenticationFailed { reason }) => {
            debug!(%reason, "Session rejected");
            clear_session_cookie(&cookies);
            login_redirect(&target).into_response()
        }
        Err(e) => AppError(e).into_response(),
    }
}

/// Compare a submitted form token with the session's.
///
/// On mismatch a notice is queued and the caller should redirect.
pub fn csrf_ok(state: &AppState, current: &CurrentUser, cookies: &Cookies, submitted: &str) -> bool {
    if !state.csrf_enabled || token::tokens_match(current.csrf_token(), submitted) {
        return true;
    }
    warn!(user_id = %current.user.id, "CSRF token mismatch");
    flash::push(
        cookies,
        Level::Danger,
        "Your form expired. Please try again.",
    );
    false
}
