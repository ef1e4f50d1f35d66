//! Handler error type.
//!
//! Handlers deal with expected failures (validation, not found, duplicate
//! email) themselves. Anything that reaches this type is unexpected: it is
//! logged and answered with a 500 page.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rentroll_core::error::RentRollError;
use tracing::error;

use crate::views;

#[derive(Debug)]
pub struct AppError(pub RentRollError);

impl From<RentRollError> for AppError {
    fn from(err: RentRollError) -> Self {
        Self(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, views::error_page()).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
