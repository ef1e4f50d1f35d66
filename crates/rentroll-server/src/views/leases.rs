use maud::{Markup, html};
use rentroll_core::ledger::DisplayRow;
use rentroll_core::models::lease::LeaseStatus;
use rentroll_core::models::property::Property;
use rentroll_core::models::tenant::Tenant;
use rentroll_core::rent;
use uuid::Uuid;

use super::{Page, csrf_field, field_errors, layout};
use crate::forms::{FieldErrors, LeaseForm};

pub struct LeasesView<'a> {
    pub properties: &'a [Property],
    /// Tenants of the selected property, offered in the tenant select.
    pub tenants: &'a [Tenant],
    pub rows: &'a [DisplayRow],
    pub units: &'a [String],
    pub selected_property: Option<Uuid>,
    pub form: &'a LeaseForm,
    pub errors: &'a FieldErrors,
    pub editing: bool,
    pub csrf_token: &'a str,
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

pub fn leases(page: Page<'_>, view: LeasesView<'_>) -> Markup {
    let form = view.form;
    let list_path = match view.selected_property {
        Some(id) => format!("/leases?property_id={id}"),
        None => "/leases".to_string(),
    };

    layout(
        page,
        html! {
            form method="get" action="/leases" {
                label for="filter" { "Property" }
                select #filter name="property_id" onchange="this.form.submit()" {
                    @for property in view.properties {
                        option value=(property.id) selected[view.selected_property == Some(property.id)] {
                            (property.name)
                        }
                    }
                }
                noscript { button type="submit" { "Filter" } }
            }

            form method="post" action="/leases" {
                (csrf_field(view.csrf_token))
                input type="hidden" name="lease_id" value=(form.lease_id);
                (field_errors(view.errors, "lease_id"))
                input type="hidden" name="property_id" value=(form.property_id);
                (field_errors(view.errors, "property_id"))
                label for="unit_number" { "Unit" }
                select #unit_number name="unit_number" {
                    option value="" { "Choose a unit" }
                    @for unit in view.units {
                        option value=(unit) selected[form.unit_number.trim() == unit.as_str()] { (unit) }
                    }
                }
                (field_errors(view.errors, "unit_number"))
                label for="tenant_id" { "Tenant" }
                select #tenant_id name="tenant_id" {
                    option value="" { "Choose a tenant" }
                    @for tenant in view.tenants {
                        option value=(tenant.id) selected[form.tenant_id == tenant.id.to_string()] {
                            (tenant.name)
                            @if let Some(unit) = tenant.unit() { " (" (unit) ")" }
                        }
                    }
                }
                (field_errors(view.errors, "tenant_id"))
                label for="rent" { "Rent (x10,000)" }
                input #rent type="text" inputmode="decimal" name="rent" value=(form.rent);
                (field_errors(view.errors, "rent"))
                label for="start_date" { "Start date" }
                input #start_date type="date" name="start_date" value=(form.start_date);
                (field_errors(view.errors, "start_date"))
                label for="end_date" { "End date" }
                input #end_date type="date" name="end_date" value=(form.end_date);
                (field_errors(view.errors, "end_date"))
                label for="status" { "Status" }
                select #status name="status" {
                    @for status in LeaseStatus::ALL {
                        option value=(status.as_str()) selected[form.status == status.as_str()] { (status.label()) }
                    }
                }
                (field_errors(view.errors, "status"))
                p {
                    button type="submit" {
                        @if view.editing { "Update lease" } @else { "Save lease" }
                    }
                    @if view.editing {
                        " " a href=(list_path) { "Cancel" }
                    }
                }
            }

            table #leases {
                thead {
                    tr {
                        th { "Property" } th { "Unit" } th { "Tenant" } th { "Rent (x10,000)" }
                        th { "Start" } th { "End" } th { "Status" } th {}
                    }
                }
                tbody {
                    @for row in view.rows {
                        tr.vacancy[row.is_vacancy()] {
                            td { (row.property.name) }
                            td { (row.unit_label.as_deref().unwrap_or("")) }
                            td { (row.tenant_name()) }
                            td { (row.rent().map(rent::to_display).unwrap_or_default()) }
                            td { (date_cell(row.start_date())) }
                            td { (date_cell(row.end_date())) }
                            td { (row.status_label()) }
                            td {
                                @if let Some(id) = row.id() {
                                    a href={ "/leases?lease_id=" (id) } { "Edit" }
                                    " "
                                }
                                form.inline method="post" action={ "/leases/" (row.tenant_id()) "/delete" } {
                                    (csrf_field(view.csrf_token))
                                    input type="hidden" name="tenant_id" value=(row.tenant_id());
                                    input type="hidden" name="next_url" value=(list_path);
                                    button type="submit" { "Delete tenant" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
