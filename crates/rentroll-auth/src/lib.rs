//! rentroll auth: staff registration, password verification and
//! cookie-backed login sessions.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod token;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginOutput, RegisterInput};
