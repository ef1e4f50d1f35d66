//! Dashboard figures: record counts and last month's rent per property.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::lease::Lease;
use crate::models::property::Property;
use crate::rent;

/// Label of the single placeholder row shown when nothing was leased.
pub const NO_DATA_LABEL: &str = "no data";

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRentRow {
    pub label: String,
    /// Rent total in display units (10,000), rounded to 2 places.
    pub rent_total: Decimal,
    pub lease_count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub property_count: u64,
    pub tenant_count: u64,
    pub lease_count: u64,
    /// Previous calendar month, inclusive bounds.
    pub period: (NaiveDate, NaiveDate),
    pub rows: Vec<PropertyRentRow>,
}

/// First and last day of the calendar month before `today`.
pub fn previous_month(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let this_month = today.with_day(1).unwrap_or(today);
    let last_day = this_month - Duration::days(1);
    let first_day = last_day.with_day(1).unwrap_or(last_day);
    (first_day, last_day)
}

/// Rent total and lease count per property for leases running at any point
/// during the month before `today`, ordered by property name.
///
/// Leases pointing at unknown properties are ignored. When no lease
/// qualifies a single [`NO_DATA_LABEL`] row with zeros is returned so the
/// chart is never empty.
pub fn rent_by_property(
    properties: &[Property],
    leases: &[Lease],
    today: NaiveDate,
) -> Vec<PropertyRentRow> {
    let (first_day, last_day) = previous_month(today);

    // Summed in display units: many large i64 rents would overflow.
    let mut totals: HashMap<Uuid, (Decimal, u64)> = HashMap::new();
    for lease in leases {
        let started = lease.start_date <= last_day;
        let not_ended = lease.end_date.is_none_or(|end| end >= first_day);
        if started && not_ended {
            let entry = totals.entry(lease.property_id).or_default();
            entry.0 += rent::in_units(lease.rent);
            entry.1 += 1;
        }
    }

    let mut named: Vec<&Property> = properties
        .iter()
        .filter(|p| totals.contains_key(&p.id))
        .collect();
    named.sort_by(|a, b| a.name.cmp(&b.name));

    let rows: Vec<PropertyRentRow> = named
        .into_iter()
        .map(|p| {
            let (total, count) = totals[&p.id];
            PropertyRentRow {
                label: p.name.clone(),
                rent_total: total.round_dp(2),
                lease_count: count,
            }
        })
        .collect();

    if rows.is_empty() {
        return vec![PropertyRentRow {
            label: NO_DATA_LABEL.into(),
            rent_total: Decimal::ZERO,
            lease_count: 0,
        }];
    }
    rows
}
