//! Server-rendered pages.

pub mod auth;
pub mod dashboard;
pub mod leases;
pub mod properties;
pub mod tenants;

use maud::{DOCTYPE, Markup, html};
use rentroll_core::models::user::User;

use crate::flash::Flash;
use crate::forms::FieldErrors;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;margin:0;color:#222}\
nav{background:#234;padding:.6rem 1rem}nav a{color:#fff;margin-right:1rem;text-decoration:none}\
nav .who{float:right;color:#cde}\
main{max-width:72rem;margin:1.5rem auto;padding:0 1rem}\
table{border-collapse:collapse;width:100%}td,th{border-bottom:1px solid #ddd;padding:.35rem;text-align:left}\
tr.vacancy{color:#888;font-style:italic}\
.flash{padding:.6rem 1rem;margin-bottom:.8rem;border-radius:4px}\
.flash-success{background:#e3f6e8}.flash-info{background:#e6f0fb}\
.flash-warning{background:#fff4d6}.flash-danger{background:#fde4e4}\
.field-error{color:#b00;margin:.1rem 0}\
form.inline{display:inline}label{display:block;margin-top:.5rem}\
.cards{display:flex;gap:1rem}.card{border:1px solid #ddd;border-radius:6px;padding:1rem;flex:1}";

/// Request-scoped bits every page needs.
pub struct Page<'a> {
    pub title: &'a str,
    pub user: Option<&'a User>,
    pub flashes: Vec<Flash>,
}

pub fn layout(page: Page<'_>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page.title) " | rentroll" }
                style { (STYLE) }
            }
            body {
                nav {
                    @if let Some(user) = page.user {
                        a href="/" { "Dashboard" }
                        a href="/properties" { "Properties" }
                        a href="/tenants" { "Tenants" }
                        a href="/leases" { "Leases" }
                        span.who {
                            (user.email) " "
                            a href="/auth/logout" { "Log out" }
                        }
                    } @else {
                        a href="/auth/login" { "Log in" }
                        a href="/auth/register" { "Register" }
                    }
                }
                main {
                    @for flash in &page.flashes {
                        div class=(flash.level.css_class()) role="alert" { (flash.message) }
                    }
                    h1 { (page.title) }
                    (content)
                }
            }
        }
    }
}

pub fn field_errors(errors: &FieldErrors, field: &str) -> Markup {
    html! {
        @for message in errors.get(field) {
            p.field-error { (message) }
        }
    }
}

pub fn csrf_field(token: &str) -> Markup {
    html! { input type="hidden" name="csrf_token" value=(token); }
}

pub fn error_page() -> Markup {
    layout(
        Page {
            title: "Something went wrong",
            user: None,
            flashes: Vec::new(),
        },
        html! {
            p { "The request could not be completed. Please try again later." }
            p { a href="/" { "Back to the dashboard" } }
        },
    )
}
