//! Tenant domain model.
//!
//! The tenant table doubles as a vacancy ledger: a row of kind
//! [`TenantKind::VacancyMarker`] records that a unit has no occupant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Name shown for vacancy markers, and the legacy sentinel that the
/// schema migration back-fills into [`TenantKind::VacancyMarker`].
pub const VACANCY_LABEL: &str = "vacant";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TenantKind {
    #[default]
    Occupant,
    VacancyMarker,
}

impl TenantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TenantKind::Occupant => "Occupant",
            TenantKind::VacancyMarker => "VacancyMarker",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Occupant" => Some(TenantKind::Occupant),
            "VacancyMarker" => Some(TenantKind::VacancyMarker),
            _ => None,
        }
    }
}

/// An occupant of a property unit, or a marker that the unit is vacant.
///
/// Deleting a tenant deletes its leases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tenant {
    pub id: Uuid,
    /// Person's name; [`VACANCY_LABEL`] for most vacancy markers.
    pub name: String,
    /// Contact email. Required for occupants by the tenant form.
    pub email: Option<String>,
    pub phone: Option<String>,
    /// The property this tenant lives in, if any.
    pub property_id: Option<Uuid>,
    /// Unit label within the property (e.g., `101`).
    pub unit_number: Option<String>,
    /// Whether this row is a person or a vacancy marker.
    pub kind: TenantKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    pub fn is_vacancy_marker(&self) -> bool {
        self.kind == TenantKind::VacancyMarker
    }

    /// Unit label, with an empty string treated as no unit.
    pub fn unit(&self) -> Option<&str> {
        self.unit_number.as_deref().filter(|u| !u.is_empty())
    }
}

/// Fields submitted by the tenant form, for both create and update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantFields {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub property_id: Option<Uuid>,
    pub unit_number: Option<String>,
    pub kind: TenantKind,
}
