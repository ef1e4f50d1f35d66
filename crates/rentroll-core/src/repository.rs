//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Implementations must make every
//! multi-row write (merges, cascading deletes) atomic.

use uuid::Uuid;

use crate::error::RentRollResult;
use crate::models::{
    lease::{Lease, LeaseFields},
    property::{Property, PropertyFields},
    session::{CreateSession, Session},
    tenant::{Tenant, TenantFields},
    user::{CreateUser, User},
};
use crate::registrar::MergePlan;

// ---------------------------------------------------------------------------
// Staff accounts
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the (lowercased) email is taken.
    fn create(&self, input: CreateUser) -> impl Future<Output = RentRollResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentRollResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = RentRollResult<User>> + Send;
}

pub trait SessionRepository: Send + Sync {
    fn create(&self, input: CreateSession) -> impl Future<Output = RentRollResult<Session>> + Send;
    fn get_by_token_hash(
        &self,
        token_hash: &str,
    ) -> impl Future<Output = RentRollResult<Session>> + Send;
    /// Invalidate a single session.
    fn invalidate(&self, id: Uuid) -> impl Future<Output = RentRollResult<()>> + Send;
    /// Remove all expired sessions, returning how many were removed.
    fn cleanup_expired(&self) -> impl Future<Output = RentRollResult<u64>> + Send;
}

// ---------------------------------------------------------------------------
// Property management
// ---------------------------------------------------------------------------

pub trait PropertyRepository: Send + Sync {
    fn create(&self, input: PropertyFields)
    -> impl Future<Output = RentRollResult<Property>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentRollResult<Property>> + Send;
    /// All properties ordered by name.
    fn list(&self) -> impl Future<Output = RentRollResult<Vec<Property>>> + Send;
    /// Properties whose name equals `name` case-insensitively, oldest first.
    fn find_by_name(&self, name: &str)
    -> impl Future<Output = RentRollResult<Vec<Property>>> + Send;
    /// Execute a resolved merge in one transaction: write `input` to the
    /// survivor (or create it), re-parent the duplicates' tenants and
    /// leases, then delete the duplicates.
    fn apply_merge(
        &self,
        plan: &MergePlan,
        input: PropertyFields,
    ) -> impl Future<Output = RentRollResult<Property>> + Send;
    /// Delete a property together with its tenants and leases.
    fn delete(&self, id: Uuid) -> impl Future<Output = RentRollResult<()>> + Send;
    fn count(&self) -> impl Future<Output = RentRollResult<u64>> + Send;
}

pub trait TenantRepository: Send + Sync {
    fn create(&self, input: TenantFields) -> impl Future<Output = RentRollResult<Tenant>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentRollResult<Tenant>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: TenantFields,
    ) -> impl Future<Output = RentRollResult<Tenant>> + Send;
    /// Delete a tenant together with its leases.
    fn delete(&self, id: Uuid) -> impl Future<Output = RentRollResult<()>> + Send;
    /// All tenants ordered by name, optionally narrowed to one property.
    fn list(
        &self,
        property_id: Option<Uuid>,
    ) -> impl Future<Output = RentRollResult<Vec<Tenant>>> + Send;
    fn count(&self) -> impl Future<Output = RentRollResult<u64>> + Send;
}

pub trait LeaseRepository: Send + Sync {
    fn create(&self, input: LeaseFields) -> impl Future<Output = RentRollResult<Lease>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = RentRollResult<Lease>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: LeaseFields,
    ) -> impl Future<Output = RentRollResult<Lease>> + Send;
    fn delete(&self, id: Uuid) -> impl Future<Output = RentRollResult<()>> + Send;
    /// Leases ordered by start date (newest first), optionally narrowed to
    /// one property.
    fn list(
        &self,
        property_id: Option<Uuid>,
    ) -> impl Future<Output = RentRollResult<Vec<Lease>>> + Send;
    /// The first lease occupying `unit_number` of `property_id`, whatever
    /// its status.
    fn find_by_unit(
        &self,
        property_id: Uuid,
        unit_number: &str,
    ) -> impl Future<Output = RentRollResult<Option<Lease>>> + Send;
    fn count(&self) -> impl Future<Output = RentRollResult<u64>> + Send;
}
