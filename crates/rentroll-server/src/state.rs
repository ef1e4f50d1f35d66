//! Shared handler state.

use std::sync::Arc;

use rentroll_auth::AuthService;
use rentroll_db::repository::{
    SurrealLeaseRepository, SurrealPropertyRepository, SurrealSessionRepository,
    SurrealTenantRepository, SurrealUserRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::any::Any;

use crate::config::ServerConfig;

pub type Auth = AuthService<SurrealUserRepository<Any>, SurrealSessionRepository<Any>>;

#[derive(Clone)]
pub struct AppState {
    pub properties: SurrealPropertyRepository<Any>,
    pub tenants: SurrealTenantRepository<Any>,
    pub leases: SurrealLeaseRepository<Any>,
    pub auth: Arc<Auth>,
    pub csrf_enabled: bool,
}

impl AppState {
    /// Wire the repositories onto one connection. Migrations are the
    /// caller's job.
    pub fn new(db: Surreal<Any>, config: &ServerConfig) -> Self {
        let users = match &config.auth.pepper {
            Some(pepper) => SurrealUserRepository::with_pepper(db.clone(), pepper.clone()),
            None => SurrealUserRepository::new(db.clone()),
        };
        let auth = AuthService::new(
            users,
            SurrealSessionRepository::new(db.clone()),
            config.auth.clone(),
        );

        Self {
            properties: SurrealPropertyRepository::new(db.clone()),
            tenants: SurrealTenantRepository::new(db.clone()),
            leases: SurrealLeaseRepository::new(db),
            auth: Arc::new(auth),
            csrf_enabled: config.csrf_enabled,
        }
    }
}
