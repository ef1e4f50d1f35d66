//! Form payloads and their validation.
//!
//! Every field arrives as a string so that a malformed value (a tampered
//! hidden id, a date typed by hand) becomes a field error on a redisplayed
//! form instead of a rejected request.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rentroll_core::models::lease::{LeaseFields, LeaseStatus};
use rentroll_core::models::property::{Property, PropertyFields};
use rentroll_core::models::tenant::{TenantFields, TenantKind, VACANCY_LABEL};
use rentroll_core::rent;
use serde::Deserialize;
use uuid::Uuid;
use validator::ValidateEmail;

/// Messages per form field, in field-name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<Vec<(&'static str, String)>> for FieldErrors {
    fn from(pairs: Vec<(&'static str, String)>) -> Self {
        let mut errors = Self::default();
        for (field, message) in pairs {
            errors.add(field, message);
        }
        errors
    }
}

fn trimmed(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

/// Blank is `Ok(None)`; anything else must be a UUID.
pub fn optional_id(value: &str) -> Result<Option<Uuid>, uuid::Error> {
    trimmed(value).map(Uuid::parse_str).transpose()
}

fn date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        match trimmed(&self.email) {
            None => errors.add("email", "Email is required."),
            Some(email) if !email.validate_email() => {
                errors.add("email", "Enter a valid email address.")
            }
            Some(_) => {}
        }
        if self.password.is_empty() {
            errors.add("password", "Password is required.");
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegisterForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NextQuery {
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyForm {
    pub property_id: String,
    pub name: String,
    pub address: String,
    pub note: String,
    pub csrf_token: String,
}

impl PropertyForm {
    pub fn from_property(property: &Property) -> Self {
        Self {
            property_id: property.id.to_string(),
            name: property.name.clone(),
            address: property.address.clone(),
            note: property.note.clone().unwrap_or_default(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<(Option<Uuid>, PropertyFields), FieldErrors> {
        let mut errors = FieldErrors::default();
        let target = optional_id(&self.property_id).unwrap_or_else(|_| {
            errors.add("property_id", "The property being edited is invalid.");
            None
        });
        if trimmed(&self.name).is_none() {
            errors.add("name", "Name is required.");
        }
        if trimmed(&self.address).is_none() {
            errors.add("address", "Address is required.");
        }
        errors.into_result((
            target,
            PropertyFields {
                name: self.name.clone(),
                address: self.address.clone(),
                note: Some(self.note.clone()),
            }
            .normalized(),
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeletePropertyForm {
    pub property_id: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PropertyQuery {
    pub property_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Tenants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TenantForm {
    pub tenant_id: String,
    pub property_id: String,
    pub unit_number: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub kind: String,
    pub csrf_token: String,
}

impl TenantForm {
    pub fn is_vacancy(&self) -> bool {
        TenantKind::parse(self.kind.trim()) == Some(TenantKind::VacancyMarker)
    }

    /// `known_properties` are the ids a tenant may be filed under.
    pub fn validate(&self, known_properties: &[Uuid]) -> Result<(Option<Uuid>, TenantFields), FieldErrors> {
        let mut errors = FieldErrors::default();
        let target = optional_id(&self.tenant_id).unwrap_or_else(|_| {
            errors.add("tenant_id", "The tenant being edited is invalid.");
            None
        });

        let property_id = match optional_id(&self.property_id) {
            Ok(Some(id)) if known_properties.contains(&id) => Some(id),
            _ => {
                errors.add("property_id", "Choose a property.");
                None
            }
        };

        let kind = match trimmed(&self.kind) {
            None => TenantKind::Occupant,
            Some(raw) => TenantKind::parse(raw).unwrap_or_else(|| {
                errors.add("kind", "Choose occupant or vacancy.");
                TenantKind::Occupant
            }),
        };

        if trimmed(&self.unit_number).is_none() {
            errors.add("unit_number", "Unit is required.");
        }

        let name = match (trimmed(&self.name), kind) {
            (Some(name), _) => name.to_string(),
            (None, TenantKind::VacancyMarker) => VACANCY_LABEL.to_string(),
            (None, TenantKind::Occupant) => {
                errors.add("name", "Name is required.");
                String::new()
            }
        };

        let email = trimmed(&self.email).map(str::to_string);
        match (&email, kind) {
            (Some(email), _) if !email.validate_email() => {
                errors.add("email", "Enter a valid email address.")
            }
            (None, TenantKind::Occupant) => {
                errors.add("email", "Email is required unless the unit is vacant.")
            }
            _ => {}
        }

        errors.into_result((
            target,
            TenantFields {
                name,
                email,
                phone: trimmed(&self.phone).map(str::to_string),
                property_id,
                unit_number: trimmed(&self.unit_number).map(str::to_string),
                kind,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeleteTenantForm {
    pub tenant_id: String,
    pub next_url: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TenantQuery {
    pub property_id: Option<String>,
    pub tenant_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Leases
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeaseForm {
    pub lease_id: String,
    pub property_id: String,
    pub unit_number: String,
    pub tenant_id: String,
    pub rent: String,
    pub start_date: String,
    pub end_date: String,
    pub status: String,
    pub csrf_token: String,
}

impl LeaseForm {
    /// Property and tenant must be among the known ids.
    pub fn validate(
        &self,
        known_properties: &[Uuid],
        known_tenants: &[Uuid],
    ) -> Result<(Option<Uuid>, LeaseFields), FieldErrors> {
        let mut errors = FieldErrors::default();
        let target = optional_id(&self.lease_id).unwrap_or_else(|_| {
            errors.add("lease_id", "The lease being edited is invalid.");
            None
        });

        let property_id = match optional_id(&self.property_id) {
            Ok(Some(id)) if known_properties.contains(&id) => id,
            _ => {
                errors.add("property_id", "Choose a property.");
                Uuid::nil()
            }
        };
        if trimmed(&self.unit_number).is_none() {
            errors.add("unit_number", "Choose a unit.");
        }
        let tenant_id = match optional_id(&self.tenant_id) {
            Ok(Some(id)) if known_tenants.contains(&id) => id,
            _ => {
                errors.add("tenant_id", "Choose a valid tenant.");
                Uuid::nil()
            }
        };
        let rent = rent::to_amount(&self.rent).unwrap_or_else(|e| {
            errors.add("rent", capitalize(&e.to_string()));
            0
        });
        let start_date = match trimmed(&self.start_date) {
            None => {
                errors.add("start_date", "Start date is required.");
                NaiveDate::MIN
            }
            Some(raw) => date(raw).unwrap_or_else(|_| {
                errors.add("start_date", "Use the YYYY-MM-DD format.");
                NaiveDate::MIN
            }),
        };
        let end_date = match trimmed(&self.end_date).map(date) {
            None => None,
            Some(Ok(end)) => Some(end),
            Some(Err(_)) => {
                errors.add("end_date", "Use the YYYY-MM-DD format.");
                None
            }
        };
        let status = LeaseStatus::parse(self.status.trim()).unwrap_or_else(|| {
            errors.add("status", "Choose a status.");
            LeaseStatus::default()
        });

        errors.into_result((
            target,
            LeaseFields {
                property_id,
                tenant_id,
                unit_number: trimmed(&self.unit_number).map(str::to_string),
                rent,
                start_date,
                end_date,
                status,
            },
        ))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LeaseQuery {
    pub property_id: Option<String>,
    pub lease_id: Option<String>,
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => format!("{}{}.", first.to_uppercase(), chars.as_str()),
        None => String::new(),
    }
}
