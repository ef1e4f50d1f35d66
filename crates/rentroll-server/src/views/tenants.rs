use std::collections::HashMap;

use maud::{Markup, html};
use rentroll_core::models::property::Property;
use rentroll_core::models::tenant::{Tenant, TenantKind};
use uuid::Uuid;

use super::{Page, csrf_field, field_errors, layout};
use crate::forms::{FieldErrors, TenantForm};

pub struct TenantsView<'a> {
    pub properties: &'a [Property],
    pub tenants: &'a [Tenant],
    pub selected_property: Option<Uuid>,
    pub form: &'a TenantForm,
    pub errors: &'a FieldErrors,
    pub editing: bool,
    pub csrf_token: &'a str,
}

pub fn tenants(page: Page<'_>, view: TenantsView<'_>) -> Markup {
    let form = view.form;
    let names: HashMap<Uuid, &str> = view
        .properties
        .iter()
        .map(|p| (p.id, p.name.as_str()))
        .collect();
    let list_path = match view.selected_property {
        Some(id) => format!("/tenants?property_id={id}"),
        None => "/tenants".to_string(),
    };

    layout(
        page,
        html! {
            form method="get" action="/tenants" {
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

            form method="post" action="/tenants" {
                (csrf_field(view.csrf_token))
                input type="hidden" name="tenant_id" value=(form.tenant_id);
                (field_errors(view.errors, "tenant_id"))
                label for="property_id" { "Property" }
                select #property_id name="property_id" {
                    @for property in view.properties {
                        option value=(property.id) selected[form.property_id == property.id.to_string()] {
                            (property.name)
                        }
                    }
                }
                (field_errors(view.errors, "property_id"))
                label for="unit_number" { "Unit" }
                input #unit_number type="text" name="unit_number" value=(form.unit_number);
                (field_errors(view.errors, "unit_number"))
                label for="kind" { "Kind" }
                select #kind name="kind" {
                    option value=(TenantKind::Occupant.as_str()) selected[!form.is_vacancy()] { "Occupant" }
                    option value=(TenantKind::VacancyMarker.as_str()) selected[form.is_vacancy()] { "Vacant unit" }
                }
                (field_errors(view.errors, "kind"))
                label for="name" { "Name" }
                input #name type="text" name="name" value=(form.name);
                (field_errors(view.errors, "name"))
                label for="email" { "Email" }
                input #email type="email" name="email" value=(form.email);
                (field_errors(view.errors, "email"))
                label for="phone" { "Phone" }
                input #phone type="text" name="phone" value=(form.phone);
                (field_errors(view.errors, "phone"))
                p {
                    button type="submit" {
                        @if view.editing { "Update tenant" } @else { "Save tenant" }
                    }
                    @if view.editing {
                        " " a href=(list_path) { "Cancel" }
                    }
                }
            }

            table #tenants {
                thead { tr { th { "Property" } th { "Unit" } th { "Name" } th { "Email" } th { "Phone" } th {} } }
                tbody {
                    @for tenant in view.tenants {
                        tr.vacancy[tenant.is_vacancy_marker()] {
                            td { (tenant.property_id.and_then(|id| names.get(&id).copied()).unwrap_or("")) }
                            td { (tenant.unit().unwrap_or("")) }
                            td { (tenant.name) }
                            td { (tenant.email.as_deref().unwrap_or("")) }
                            td { (tenant.phone.as_deref().unwrap_or("")) }
                            td {
                                a href={ "/tenants?tenant_id=" (tenant.id) } { "Edit" }
                                " "
                                form.inline method="post" action={ "/tenants/" (tenant.id) "/delete" } {
                                    (csrf_field(view.csrf_token))
                                    input type="hidden" name="tenant_id" value=(tenant.id);
                                    input type="hidden" name="next_url" value=(list_path);
                                    button type="submit" { "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        },
    )
}
