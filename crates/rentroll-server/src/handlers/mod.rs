//! Route handlers, one module per page.

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod leases;
pub mod properties;
pub mod tenants;

use axum::Extension;
use tower_cookies::Cookies;

use crate::flash;
use crate::session::CurrentUser;
use crate::views::Page;

/// Page chrome for a signed-in user, draining any queued notices.
pub(crate) fn page<'a>(
    title: &'a str,
    current: &'a Extension<CurrentUser>,
    cookies: &Cookies,
) -> Page<'a> {
    Page {
        title,
        user: Some(&current.user),
        flashes: flash::take(cookies),
    }
}
