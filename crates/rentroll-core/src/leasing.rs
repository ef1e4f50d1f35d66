//! Lease save policy.
//!
//! A unit holds at most one lease row. Saving a new lease for a unit that
//! already has one overwrites that row instead of adding a second.

use tracing::debug;
use uuid::Uuid;

use crate::error::RentRollResult;
use crate::models::lease::{Lease, LeaseFields};
use crate::repository::LeaseRepository;

#[derive(Debug, Clone)]
pub enum LeaseOutcome {
    Created(Lease),
    Updated(Lease),
}

impl LeaseOutcome {
    pub fn lease(&self) -> &Lease {
        match self {
            LeaseOutcome::Created(l) | LeaseOutcome::Updated(l) => l,
        }
    }
}

/// Save a lease submitted by the lease form.
///
/// With `lease_id` the lease is updated (NotFound if it is gone). Without
/// it, an existing lease on the same property and unit is overwritten;
/// otherwise a new lease is created.
pub async fn save_lease<R: LeaseRepository>(
    repo: &R,
    lease_id: Option<Uuid>,
    mut input: LeaseFields,
) -> RentRollResult<LeaseOutcome> {
    input.unit_number = input
        .unit_number
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());

    if let Some(id) = lease_id {
        let lease = repo.update(id, input).await?;
        return Ok(LeaseOutcome::Updated(lease));
    }

    if let Some(unit) = input.unit_number.as_deref()
        && let Some(existing) = repo.find_by_unit(input.property_id, unit).await?
    {
        debug!(lease_id = %existing.id, unit, "Overwriting lease occupying unit");
        let lease = repo.update(existing.id, input).await?;
        return Ok(LeaseOutcome::Updated(lease));
    }

    Ok(LeaseOutcome::Created(repo.create(input).await?))
}
