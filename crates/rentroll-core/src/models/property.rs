//! Property domain model.
//!
//! A property owns its tenants and leases: deleting it removes both.
//! Names are unique case-insensitively, but only by the merge performed in
//! [`crate::registrar`], never by a schema constraint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Property {
    pub id: Uuid,
    /// Display name, stored trimmed.
    pub name: String,
    pub address: String,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The editable fields of a property, as submitted by the property form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PropertyFields {
    pub name: String,
    pub address: String,
    pub note: Option<String>,
}

impl PropertyFields {
    /// Returns the fields with the name trimmed and an empty note dropped.
    pub fn normalized(self) -> Self {
        let note = self
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            note,
        }
    }
}
