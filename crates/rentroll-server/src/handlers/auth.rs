//! Login, registration and logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Form, Router};
use rentroll_auth::RegisterInput;
use rentroll_core::error::RentRollError;
use tower_cookies::Cookies;
use tracing::info;

use crate::error::AppResult;
use crate::flash::{self, Flash, Level};
use crate::forms::{FieldErrors, LoginForm, NextQuery, RegisterForm};
use crate::session::{clear_session_cookie, safe_next, session_token, set_session_cookie};
use crate::state::AppState;
use crate::views;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/login", get(login_page).post(login))
        .route("/auth/register", get(register_page).post(register))
        .route("/auth/logout", get(logout))
}

async fn signed_in(state: &AppState, cookies: &Cookies) -> bool {
    match session_token(cookies) {
        Some(token) => state.auth.authenticate(&token).await.is_ok(),
        None => false,
    }
}

async fn login_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<NextQuery>,
) -> Response {
    if signed_in(&state, &cookies).await {
        return Redirect::to("/").into_response();
    }
    views::auth::login(
        &LoginForm::default(),
        &FieldErrors::default(),
        safe_next(query.next.as_deref()),
        flash::take(&cookies),
    )
    .into_response()
}

async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if signed_in(&state, &cookies).await {
        return Ok(Redirect::to("/").into_response());
    }
    let next = safe_next(query.next.as_deref());

    let errors = form.validate();
    if !errors.is_empty() {
        let page = views::auth::login(&form, &errors, next, Vec::new());
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    match state.auth.login(&form.email, &form.password).await {
        Ok(output) => {
            set_session_cookie(
                &cookies,
                output.session_token,
                state.auth.config().session_lifetime_secs,
            );
            info!(user_id = %output.user.id, "User logged in");
            Ok(Redirect::to(next.unwrap_or("/")).into_response())
        }
        Err(RentRollError::AuthenticationFailed { .. }) => {
            let flashes = vec![Flash::new(Level::Danger, "Invalid email or password.")];
            let page = views::auth::login(&form, &FieldErrors::default(), next, flashes);
            Ok((StatusCode::UNAUTHORIZED, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn register_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    if signed_in(&state, &cookies).await {
        return Redirect::to("/").into_response();
    }
    views::auth::register(
        &RegisterForm::default(),
        &FieldErrors::default(),
        flash::take(&cookies),
    )
    .into_response()
}

async fn register(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    if signed_in(&state, &cookies).await {
        return Ok(Redirect::to("/").into_response());
    }
    let input = RegisterInput {
        email: form.email.clone(),
        password: form.password.clone(),
        confirm_password: form.confirm_password.clone(),
        role: form.role.clone(),
    };

    let errors = FieldErrors::from(input.validate(state.auth.config().min_password_length));
    if !errors.is_empty() {
        let page = views::auth::register(&form, &errors, Vec::new());
        return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
    }

    match state.auth.register(input).await {
        Ok(output) => {
            set_session_cookie(
                &cookies,
                output.session_token,
                state.auth.config().session_lifetime_secs,
            );
            Ok(Redirect::to("/").into_response())
        }
        Err(RentRollError::AlreadyExists { .. }) => {
            let flashes = vec![Flash::new(
                Level::Warning,
                "This email is already registered.",
            )];
            let page = views::auth::register(&form, &FieldErrors::default(), flashes);
            Ok((StatusCode::CONFLICT, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

async fn logout(State(state): State<AppState>, cookies: Cookies) -> AppResult<Redirect> {
    if let Some(token) = session_token(&cookies) {
        state.auth.logout(&token).await?;
    }
    clear_session_cookie(&cookies);
    flash::push(&cookies, Level::Info, "You have been logged out.");
    Ok(Redirect::to("/auth/login"))
}
