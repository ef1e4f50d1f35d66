//! Lease list construction.
//!
//! A unit is either covered by a lease or recorded as vacant by a vacancy
//! marker tenant. The lease list shows both in one ordered table, and a
//! unit must never appear occupied and vacant at the same time: a marker
//! whose unit has any lease row (whatever its status) is stale and hidden.

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::lease::Lease;
use crate::models::property::Property;
use crate::models::tenant::{Tenant, VACANCY_LABEL};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyRef {
    pub id: Uuid,
    pub name: String,
}

/// What occupies a unit in the lease list.
#[derive(Debug, Clone, PartialEq)]
pub enum UnitOccupancy {
    Leased {
        lease: Lease,
        /// `None` when the tenant row is gone.
        tenant_name: Option<String>,
    },
    Vacant {
        property_id: Uuid,
        unit_label: String,
        marker_tenant_id: Uuid,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayRow {
    pub property: PropertyRef,
    pub unit_label: Option<String>,
    pub occupancy: UnitOccupancy,
}

impl DisplayRow {
    pub fn is_vacancy(&self) -> bool {
        matches!(self.occupancy, UnitOccupancy::Vacant { .. })
    }

    /// Lease id; vacancy rows have none.
    pub fn id(&self) -> Option<Uuid> {
        match &self.occupancy {
            UnitOccupancy::Leased { lease, .. } => Some(lease.id),
            UnitOccupancy::Vacant { .. } => None,
        }
    }

    pub fn lease(&self) -> Option<&Lease> {
        match &self.occupancy {
            UnitOccupancy::Leased { lease, .. } => Some(lease),
            UnitOccupancy::Vacant { .. } => None,
        }
    }

    pub fn tenant_id(&self) -> Uuid {
        match &self.occupancy {
            UnitOccupancy::Leased { lease, .. } => lease.tenant_id,
            UnitOccupancy::Vacant {
                marker_tenant_id, ..
            } => *marker_tenant_id,
        }
    }

    pub fn tenant_name(&self) -> &str {
        match &self.occupancy {
            UnitOccupancy::Leased { tenant_name, .. } => tenant_name.as_deref().unwrap_or(""),
            UnitOccupancy::Vacant { .. } => VACANCY_LABEL,
        }
    }

    pub fn rent(&self) -> Option<i64> {
        self.lease().map(|l| l.rent)
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.lease().map(|l| l.start_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.lease().and_then(|l| l.end_date)
    }

    pub fn status_label(&self) -> &'static str {
        match &self.occupancy {
            UnitOccupancy::Leased { lease, .. } => lease.status.label(),
            UnitOccupancy::Vacant { .. } => VACANCY_LABEL,
        }
    }

    fn sort_key(&self) -> (&str, &str, bool, Reverse<NaiveDate>) {
        (
            self.property.name.as_str(),
            self.unit_label.as_deref().unwrap_or(""),
            self.is_vacancy(),
            Reverse(self.start_date().unwrap_or(NaiveDate::MIN)),
        )
    }
}

/// Build the lease list: real leases plus synthetic rows for vacancy
/// markers whose unit no listed lease covers.
///
/// Leases whose property is missing from `properties` are dropped, as are
/// leases outside `scope_property_id` when it is set. Rows are ordered by
/// property name, unit label, leases before vacancies, then start date
/// newest first. The sort is stable, so equal keys keep input order.
pub fn build_lease_rows(
    leases: Vec<Lease>,
    tenants: &[Tenant],
    properties: &[Property],
    scope_property_id: Option<Uuid>,
) -> Vec<DisplayRow> {
    let property_refs: HashMap<Uuid, PropertyRef> = properties
        .iter()
        .map(|p| {
            (
                p.id,
                PropertyRef {
                    id: p.id,
                    name: p.name.clone(),
                },
            )
        })
        .collect();
    let tenant_names: HashMap<Uuid, &str> =
        tenants.iter().map(|t| (t.id, t.name.as_str())).collect();

    let mut rows: Vec<DisplayRow> = leases
        .into_iter()
        .filter(|lease| scope_property_id.is_none_or(|scope| lease.property_id == scope))
        .filter_map(|lease| {
            let property = property_refs.get(&lease.property_id)?.clone();
            let tenant_name = tenant_names.get(&lease.tenant_id).map(|n| n.to_string());
            Some(DisplayRow {
                property,
                unit_label: lease.unit().map(str::to_string),
                occupancy: UnitOccupancy::Leased { lease, tenant_name },
            })
        })
        .collect();

    let occupied: HashSet<(Uuid, String)> = rows
        .iter()
        .filter_map(|row| Some((row.property.id, row.unit_label.clone()?)))
        .collect();

    for tenant in tenants.iter().filter(|t| t.is_vacancy_marker()) {
        let (Some(property_id), Some(unit)) = (tenant.property_id, tenant.unit()) else {
            continue;
        };
        if occupied.contains(&(property_id, unit.to_string())) {
            continue;
        }
        if scope_property_id.is_some_and(|scope| scope != property_id) {
            continue;
        }
        let Some(property) = property_refs.get(&property_id) else {
            continue;
        };
        rows.push(DisplayRow {
            property: property.clone(),
            unit_label: Some(unit.to_string()),
            occupancy: UnitOccupancy::Vacant {
                property_id,
                unit_label: unit.to_string(),
                marker_tenant_id: tenant.id,
            },
        });
    }

    rows.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    rows
}

/// Order tenants for the tenant list: property name, unit, tenant name.
/// Tenants without a property sort first.
pub fn sort_tenants(tenants: &mut [Tenant], properties: &[Property]) {
    let names: HashMap<Uuid, &str> = properties.iter().map(|p| (p.id, p.name.as_str())).collect();
    let key = |t: &Tenant| {
        (
            t.property_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or(""),
            t.unit_number.clone().unwrap_or_default(),
            t.name.clone(),
        )
    };
    tenants.sort_by(|a, b| key(a).cmp(&key(b)));
}

/// Distinct unit labels known for a property, sorted, for the lease form.
pub fn unit_choices(tenants: &[Tenant], property_id: Option<Uuid>) -> Vec<String> {
    let Some(property_id) = property_id else {
        return Vec::new();
    };
    tenants
        .iter()
        .filter(|t| t.property_id == Some(property_id))
        .filter_map(|t| t.unit().map(str::to_string))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::models::lease::LeaseStatus;
    use crate::models::tenant::TenantKind;

    fn property(name: &str) -> Property {
        Property {
            id: Uuid::now_v7(),
            name: name.into(),
            address: "addr".into(),
            note: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn tenant(property: &Property, unit: Option<&str>, kind: TenantKind) -> Tenant {
        Tenant {
            id: Uuid::now_v7(),
            name: match kind {
                TenantKind::Occupant => "Jane Doe".into(),
                TenantKind::VacancyMarker => VACANCY_LABEL.into(),
            },
            email: None,
            phone: None,
            property_id: Some(property.id),
            unit_number: unit.map(str::to_string),
            kind,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn lease(property: &Property, tenant: &Tenant, unit: Option<&str>, start: &str) -> Lease {
        Lease {
            id: Uuid::now_v7(),
            property_id: property.id,
            tenant_id: tenant.id,
            unit_number: unit.map(str::to_string),
            rent: 100_000,
            start_date: start.parse().unwrap(),
            end_date: None,
            status: LeaseStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn vacancy_marker_without_lease_yields_vacant_row() {
        let p = property("Maple Court");
        let marker = tenant(&p, Some("101"), TenantKind::VacancyMarker);

        let rows = build_lease_rows(vec![], &[marker.clone()], &[p.clone()], None);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert!(row.is_vacancy());
        assert_eq!(row.id(), None);
        assert_eq!(row.rent(), None);
        assert_eq!(row.start_date(), None);
        assert_eq!(row.end_date(), None);
        assert_eq!(row.status_label(), "vacant");
        assert_eq!(row.tenant_id(), marker.id);
        assert_eq!(row.unit_label.as_deref(), Some("101"));
    }

    #[test]
    fn any_lease_on_the_unit_hides_the_marker() {
        let p = property("Maple Court");
        let marker = tenant(&p, Some("101"), TenantKind::VacancyMarker);
        let occupant = tenant(&p, Some("101"), TenantKind::Occupant);
        let mut l = lease(&p, &occupant, Some("101"), "2024-01-01");
        l.status = LeaseStatus::Terminated;

        let tenants = [marker, occupant];
        let rows = build_lease_rows(vec![l], &tenants, &[p.clone()], None);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_vacancy());
        assert_eq!(rows[0].tenant_name(), "Jane Doe");

        // Without the lease the vacancy reappears.
        let rows = build_lease_rows(vec![], &tenants, &[p], None);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_vacancy());
    }

    #[test]
    fn marker_without_unit_is_ignored() {
        let p = property("Maple Court");
        let marker = tenant(&p, None, TenantKind::VacancyMarker);
        let blank = tenant(&p, Some(""), TenantKind::VacancyMarker);
        let rows = build_lease_rows(vec![], &[marker, blank], &[p], None);
        assert!(rows.is_empty());
    }

    #[test]
    fn lease_without_unit_never_collides_with_marker() {
        let p = property("Maple Court");
        let occupant = tenant(&p, None, TenantKind::Occupant);
        let marker = tenant(&p, Some("101"), TenantKind::VacancyMarker);
        let l = lease(&p, &occupant, None, "2024-01-01");

        let rows = build_lease_rows(vec![l], &[occupant, marker], &[p], None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.iter().filter(|r| r.is_vacancy()).count(), 1);
    }

    #[test]
    fn occupant_tenants_never_produce_vacancies() {
        let p = property("Maple Court");
        let occupant = tenant(&p, Some("101"), TenantKind::Occupant);
        let rows = build_lease_rows(vec![], &[occupant], &[p], None);
        assert!(rows.is_empty());
    }

    #[test]
    fn scope_filter_applies_to_leases_and_vacancies() {
        let a = property("Alder House");
        let b = property("Birch Yard");
        let occupant = tenant(&a, Some("1"), TenantKind::Occupant);
        let marker_a = tenant(&a, Some("2"), TenantKind::VacancyMarker);
        let marker_b = tenant(&b, Some("1"), TenantKind::VacancyMarker);
        let l = lease(&a, &occupant, Some("1"), "2024-01-01");

        let rows = build_lease_rows(
            vec![l],
            &[occupant, marker_a, marker_b],
            &[a.clone(), b.clone()],
            Some(b.id),
        );
        assert_eq!(rows.len(), 1);
        assert!(rows[0].is_vacancy());
        assert_eq!(rows[0].property.id, b.id);
    }

    #[test]
    fn lease_whose_property_is_missing_is_dropped() {
        let p = property("Maple Court");
        let gone = property("Gone");
        let occupant = tenant(&gone, Some("1"), TenantKind::Occupant);
        let l = lease(&gone, &occupant, Some("1"), "2024-01-01");
        let rows = build_lease_rows(vec![l], &[occupant], &[p], None);
        assert!(rows.is_empty());
    }

    #[test]
    fn rows_sort_by_property_unit_kind_then_newest_start() {
        let a = property("Alder House");
        let b = property("Birch Yard");
        let ta = tenant(&a, Some("101"), TenantKind::Occupant);
        let tb = tenant(&b, Some("101"), TenantKind::Occupant);
        let marker_a = tenant(&a, Some("102"), TenantKind::VacancyMarker);

        let old = lease(&a, &ta, Some("101"), "2022-04-01");
        let new = lease(&a, &ta, Some("101"), "2024-04-01");
        let other = lease(&b, &tb, Some("101"), "2023-01-01");
        let no_unit = lease(&a, &ta, None, "2021-01-01");

        let tenants = [ta, tb, marker_a];
        let properties = [b.clone(), a.clone()];
        let input = vec![other.clone(), old.clone(), no_unit.clone(), new.clone()];

        let rows = build_lease_rows(input.clone(), &tenants, &properties, None);
        let order: Vec<Option<Uuid>> = rows.iter().map(DisplayRow::id).collect();
        assert_eq!(
            order,
            vec![
                Some(no_unit.id),
                Some(new.id),
                Some(old.id),
                None,
                Some(other.id),
            ]
        );

        // Same input, same order.
        let again = build_lease_rows(input, &tenants, &properties, None);
        assert_eq!(rows, again);
    }

    #[test]
    fn unit_choices_are_distinct_and_sorted() {
        let p = property("Maple Court");
        let other = property("Other");
        let tenants = [
            tenant(&p, Some("201"), TenantKind::Occupant),
            tenant(&p, Some("101"), TenantKind::VacancyMarker),
            tenant(&p, Some("201"), TenantKind::Occupant),
            tenant(&p, None, TenantKind::Occupant),
            tenant(&other, Some("301"), TenantKind::Occupant),
        ];
        assert_eq!(unit_choices(&tenants, Some(p.id)), vec!["101", "201"]);
        assert!(unit_choices(&tenants, None).is_empty());
    }

    #[test]
    fn tenants_sort_by_property_then_unit_then_name() {
        let a = property("Alder House");
        let b = property("Birch Yard");
        let mut t1 = tenant(&b, Some("101"), TenantKind::Occupant);
        t1.name = "Zed".into();
        let mut t2 = tenant(&a, Some("201"), TenantKind::Occupant);
        t2.name = "Amy".into();
        let mut t3 = tenant(&a, Some("101"), TenantKind::Occupant);
        t3.name = "Bob".into();

        let mut tenants = vec![t1.clone(), t2.clone(), t3.clone()];
        sort_tenants(&mut tenants, &[a, b]);
        let ids: Vec<Uuid> = tenants.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![t3.id, t2.id, t1.id]);
    }
}
