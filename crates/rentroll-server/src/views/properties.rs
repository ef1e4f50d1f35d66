use maud::{Markup, html};
use rentroll_core::models::property::Property;

use super::{Page, csrf_field, field_errors, layout};
use crate::forms::{FieldErrors, PropertyForm};

pub struct PropertiesView<'a> {
    pub properties: &'a [Property],
    pub form: &'a PropertyForm,
    pub errors: &'a FieldErrors,
    pub editing: bool,
    pub csrf_token: &'a str,
}

pub fn properties(page: Page<'_>, view: PropertiesView<'_>) -> Markup {
    let form = view.form;
    layout(
        page,
        html! {
            form method="post" action="/properties" {
                (csrf_field(view.csrf_token))
                input type="hidden" name="property_id" value=(form.property_id);
                (field_errors(view.errors, "property_id"))
                label for="name" { "Name" }
                input #name type="text" name="name" value=(form.name);
                (field_errors(view.errors, "name"))
                label for="address" { "Address" }
                input #address type="text" name="address" value=(form.address);
                (field_errors(view.errors, "address"))
                label for="note" { "Note" }
                textarea #note name="note" { (form.note) }
                p {
                    button type="submit" {
                        @if view.editing { "Update property" } @else { "Save property" }
                    }
                    @if view.editing {
                        " " a href="/properties" { "Cancel" }
                    }
                }
            }

            table #properties {
                thead { tr { th { "Name" } th { "Address" } th { "Note" } th {} } }
                tbody {
                    @for property in view.properties {
                        tr {
                            td { (property.name) }
                            td { (property.address) }
                            td { (property.note.as_deref().unwrap_or("")) }
                            td {
                                a href={ "/properties?property_id=" (property.id) } { "Edit" }
                                " "
                                form.inline method="post" action="/properties/delete" {
                                    (csrf_field(view.csrf_token))
                                    input type="hidden" name="property_id" value=(property.id);
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
