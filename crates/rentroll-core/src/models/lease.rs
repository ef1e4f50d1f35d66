//! Lease domain model.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaseStatus {
    Active,
    #[default]
    Pending,
    Terminated,
}

impl LeaseStatus {
    pub const ALL: [LeaseStatus; 3] = [
        LeaseStatus::Active,
        LeaseStatus::Pending,
        LeaseStatus::Terminated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaseStatus::Active => "active",
            LeaseStatus::Pending => "pending",
            LeaseStatus::Terminated => "terminated",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(LeaseStatus::Active),
            "pending" => Some(LeaseStatus::Pending),
            "terminated" => Some(LeaseStatus::Terminated),
            _ => None,
        }
    }

    /// Human readable label used by the lease list.
    pub fn label(&self) -> &'static str {
        match self {
            LeaseStatus::Active => "Active",
            LeaseStatus::Pending => "Pending",
            LeaseStatus::Terminated => "Terminated",
        }
    }
}

impl fmt::Display for LeaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A rental agreement for one unit of a property.
///
/// A unit holds at most one lease; see [`crate::leasing`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lease {
    pub id: Uuid,
    /// The leased property.
    pub property_id: Uuid,
    /// The lessee.
    pub tenant_id: Uuid,
    /// Unit label within the property; leases without one never cover a
    /// vacancy marker.
    pub unit_number: Option<String>,
    /// Full amount; the UI works in units of 10,000 (see [`crate::rent`]).
    pub rent: i64,
    /// First day of the lease.
    pub start_date: NaiveDate,
    /// `None` means the lease is ongoing.
    pub end_date: Option<NaiveDate>,
    pub status: LeaseStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Lease {
    pub fn unit(&self) -> Option<&str> {
        self.unit_number.as_deref().filter(|u| !u.is_empty())
    }
}

/// Fields submitted by the lease form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaseFields {
    pub property_id: Uuid,
    pub tenant_id: Uuid,
    pub unit_number: Option<String>,
    pub rent: i64,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: LeaseStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parse_matches_as_str() {
        for status in LeaseStatus::ALL {
            assert_eq!(LeaseStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(LeaseStatus::parse("vacant"), None);
    }

    #[test]
    fn default_status_is_pending() {
        assert_eq!(LeaseStatus::default(), LeaseStatus::Pending);
    }
}
