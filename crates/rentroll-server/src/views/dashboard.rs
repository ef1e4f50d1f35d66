use maud::{Markup, html};
use rentroll_core::dashboard::DashboardSummary;

use super::{Page, layout};

pub fn dashboard(page: Page<'_>, summary: &DashboardSummary) -> Markup {
    let (first_day, last_day) = summary.period;
    layout(
        page,
        html! {
            div.cards {
                div.card { h2 { (summary.property_count) } "Properties" }
                div.card { h2 { (summary.tenant_count) } "Tenants" }
                div.card { h2 { (summary.lease_count) } "Leases" }
            }
            h2 { "Rent by property, " (first_day.format("%Y-%m-%d")) " to " (last_day.format("%Y-%m-%d")) }
            table #rent-by-property {
                thead { tr { th { "Property" } th { "Rent (x10,000)" } th { "Leases" } } }
                tbody {
                    @for row in &summary.rows {
                        tr {
                            td { (row.label) }
                            td { (row.rent_total) }
                            td { (row.lease_count) }
                        }
                    }
                }
            }
        },
    )
}
