//! Property registrar: resolve-or-create with duplicate merging.
//!
//! Property names are unique case-insensitively, enforced here rather than
//! by an index. Submitting a name that already exists converges on one
//! canonical row: the survivor takes the submitted fields, every other
//! match hands its tenants and leases to the survivor and is deleted.
//!
//! Deciding *what* to merge is pure ([`MergePlan::resolve`]); executing it
//! atomically is the repository's job ([`PropertyRepository::apply_merge`]).
//! Two concurrent submissions of a new name can both observe no match and
//! create two rows; the next edit of either one merges them.

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{RentRollError, RentRollResult};
use crate::models::property::{Property, PropertyFields};
use crate::repository::PropertyRepository;

/// Which row survives a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Survivor {
    /// Write the submitted fields to this existing property.
    Existing(Uuid),
    /// No property has the name yet: create one.
    Create,
}

/// The outcome of duplicate resolution for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergePlan {
    pub survivor: Survivor,
    /// Properties to fold into the survivor, oldest first.
    pub duplicates: Vec<Uuid>,
}

impl MergePlan {
    /// Decide the survivor and duplicates.
    ///
    /// `matches` are the properties sharing the submitted name, oldest
    /// first. When editing (`target` is `Some`) the edited row survives even
    /// if an older row shares the name; otherwise the oldest match does.
    pub fn resolve(target: Option<Uuid>, matches: &[Property]) -> Self {
        match target {
            Some(target) => Self {
                survivor: Survivor::Existing(target),
                duplicates: matches
                    .iter()
                    .map(|p| p.id)
                    .filter(|id| *id != target)
                    .collect(),
            },
            None => match matches.split_first() {
                Some((canonical, rest)) => Self {
                    survivor: Survivor::Existing(canonical.id),
                    duplicates: rest.iter().map(|p| p.id).collect(),
                },
                None => Self {
                    survivor: Survivor::Create,
                    duplicates: Vec::new(),
                },
            },
        }
    }

    pub fn survivor_id(&self) -> Option<Uuid> {
        match self.survivor {
            Survivor::Existing(id) => Some(id),
            Survivor::Create => None,
        }
    }

    pub fn needs_reparenting(&self) -> bool {
        !self.duplicates.is_empty()
    }
}

/// What [`upsert_property`] did, so callers can phrase their notice.
#[derive(Debug, Clone)]
pub enum RegistrarOutcome {
    Created(Property),
    Updated(Property),
}

impl RegistrarOutcome {
    pub fn property(&self) -> &Property {
        match self {
            RegistrarOutcome::Created(p) | RegistrarOutcome::Updated(p) => p,
        }
    }

    pub fn into_property(self) -> Property {
        match self {
            RegistrarOutcome::Created(p) | RegistrarOutcome::Updated(p) => p,
        }
    }
}

/// Create or update a property, merging case-insensitive name duplicates.
///
/// Creating a name that already exists updates the oldest property with
/// that name instead, overwriting its address and note.
pub async fn upsert_property<R: PropertyRepository>(
    repo: &R,
    target_id: Option<Uuid>,
    input: PropertyFields,
) -> RentRollResult<RegistrarOutcome> {
    let input = input.normalized();
    if input.name.is_empty() {
        return Err(RentRollError::Validation {
            message: "property name is required".into(),
        });
    }
    if input.address.is_empty() {
        return Err(RentRollError::Validation {
            message: "property address is required".into(),
        });
    }

    if let Some(id) = target_id {
        // Editing a row that vanished must not silently create a new one.
        repo.get_by_id(id).await?;
    }

    let matches = repo.find_by_name(&input.name).await?;
    let plan = MergePlan::resolve(target_id, &matches);

    if plan.needs_reparenting() {
        info!(
            name = %input.name,
            survivor = ?plan.survivor_id(),
            duplicates = plan.duplicates.len(),
            "Merging duplicate properties"
        );
    } else {
        debug!(name = %input.name, survivor = ?plan.survivor_id(), "Saving property");
    }

    let property = repo.apply_merge(&plan, input).await?;
    Ok(match plan.survivor {
        Survivor::Create => RegistrarOutcome::Created(property),
        Survivor::Existing(_) => RegistrarOutcome::Updated(property),
    })
}
