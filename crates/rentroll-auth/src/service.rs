//! Authentication service: registration, login, session lookup, logout.

use chrono::{Duration, Utc};
use rentroll_core::error::{RentRollError, RentRollResult};
use rentroll_core::models::session::{CreateSession, Session};
use rentroll_core::models::user::{CreateUser, User};
use rentroll_core::repository::{SessionRepository, UserRepository};
use tracing::{debug, info, warn};
use validator::ValidateEmail;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for the registration flow, as submitted by the form.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// Blank means the default role.
    pub role: String,
}

impl RegisterInput {
    /// Field-level problems, keyed by form field name. Empty when valid.
    pub fn validate(&self, min_password_length: usize) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        let email = self.email.trim();
        if email.is_empty() {
            errors.push(("email", "Email is required.".to_string()));
        } else if !email.validate_email() {
            errors.push(("email", "Enter a valid email address.".to_string()));
        }
        if self.password.is_empty() {
            errors.push(("password", "Password is required.".to_string()));
        } else if self.password.chars().count() < min_password_length {
            errors.push((
                "password",
                format!("Password must be at least {min_password_length} characters."),
            ));
        }
        if self.confirm_password.is_empty() {
            errors.push(("confirm_password", "Confirm your password.".to_string()));
        } else if self.confirm_password != self.password {
            errors.push(("confirm_password", "Passwords do not match.".to_string()));
        }
        errors
    }
}

/// Successful login (or registration) result.
#[derive(Debug)]
pub struct LoginOutput {
    /// Raw session token for the cookie; only its hash is stored.
    pub session_token: String,
    pub session: Session,
    pub user: User,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, S: SessionRepository> {
    user_repo: U,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, S: SessionRepository> AuthService<U, S> {
    pub fn new(user_repo: U, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            session_repo,
            config,
        }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Create a staff account and log it in.
    ///
    /// A taken email surfaces as `AlreadyExists`.
    pub async fn register(&self, input: RegisterInput) -> RentRollResult<LoginOutput> {
        if let Some((field, message)) = input
            .validate(self.config.min_password_length)
            .into_iter()
            .next()
        {
            return Err(RentRollError::Validation {
                message: format!("{field}: {message}"),
            });
        }

        let role = Some(input.role.trim().to_string()).filter(|r| !r.is_empty());
        let user = self
            .user_repo
            .create(CreateUser {
                email: input.email,
                password: input.password,
                role,
            })
            .await?;
        info!(user_id = %user.id, "Registered staff account");

        self.start_session(user).await
    }

    /// Verify email + password and open a session.
    ///
    /// Unknown email and wrong password are indistinguishable to callers.
    pub async fn login(&self, email: &str, password: &str) -> RentRollResult<LoginOutput> {
        let user = match self.user_repo.get_by_email(email).await {
            Ok(user) => user,
            Err(RentRollError::NotFound { .. }) => {
                debug!("Login for unknown email");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let valid = password::verify_password(
            password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;
        if !valid {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        self.start_session(user).await
    }

    /// Resolve a raw cookie token to its user and session.
    ///
    /// Expired sessions are deleted on sight.
    pub async fn authenticate(&self, raw_token: &str) -> RentRollResult<(User, Session)> {
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                RentRollError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            self.session_repo.invalidate(session.id).await?;
            return Err(AuthError::SessionExpired.into());
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .map_err(|e| match e {
                RentRollError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;
        Ok((user, session))
    }

    /// Drop the session behind a raw cookie token. Unknown tokens are ignored.
    pub async fn logout(&self, raw_token: &str) -> RentRollResult<()> {
        let token_hash = token::hash_session_token(raw_token);
        match self.session_repo.get_by_token_hash(&token_hash).await {
            Ok(session) => {
                self.session_repo.invalidate(session.id).await?;
                debug!(session_id = %session.id, "Session closed");
                Ok(())
            }
            Err(RentRollError::NotFound { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn start_session(&self, user: User) -> RentRollResult<LoginOutput> {
        let raw_token = token::generate_session_token();
        let expires_at = Utc::now() + Duration::seconds(self.config.session_lifetime_secs as i64);

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash: token::hash_session_token(&raw_token),
                csrf_token: token::generate_csrf_token(),
                expires_at,
            })
            .await?;

        Ok(LoginOutput {
            session_token: raw_token,
            session,
            user,
        })
    }
}
