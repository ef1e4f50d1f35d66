//! Authentication error types.

use rentroll_core::error::RentRollError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("session has expired")]
    SessionExpired,

    #[error("no such session")]
    SessionInvalid,

    #[error("cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for RentRollError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::SessionInvalid => RentRollError::AuthenticationFailed {
                reason: err.to_string(),
            },
            AuthError::Crypto(msg) => RentRollError::Crypto(msg),
        }
    }
}
