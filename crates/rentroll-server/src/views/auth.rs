use maud::{Markup, html};
use url::form_urlencoded;

use super::{Page, field_errors, layout};
use crate::flash::Flash;
use crate::forms::{FieldErrors, LoginForm, RegisterForm};

pub fn login(form: &LoginForm, errors: &FieldErrors, next: Option<&str>, flashes: Vec<Flash>) -> Markup {
    let action = match next {
        Some(next) => format!(
            "/auth/login?{}",
            form_urlencoded::Serializer::new(String::new())
                .append_pair("next", next)
                .finish()
        ),
        None => "/auth/login".to_string(),
    };

    layout(
        Page {
            title: "Log in",
            user: None,
            flashes,
        },
        html! {
            form method="post" action=(action) {
                label for="email" { "Email" }
                input #email type="email" name="email" value=(form.email) required;
                (field_errors(errors, "email"))
                label for="password" { "Password" }
                input #password type="password" name="password" required;
                (field_errors(errors, "password"))
                p { button type="submit" { "Log in" } }
            }
            p { "No account yet? " a href="/auth/register" { "Register" } }
        },
    )
}

pub fn register(form: &RegisterForm, errors: &FieldErrors, flashes: Vec<Flash>) -> Markup {
    layout(
        Page {
            title: "Register",
            user: None,
            flashes,
        },
        html! {
            form method="post" action="/auth/register" {
                label for="email" { "Email" }
                input #email type="email" name="email" value=(form.email) required;
                (field_errors(errors, "email"))
                label for="password" { "Password" }
                input #password type="password" name="password" required;
                (field_errors(errors, "password"))
                label for="confirm_password" { "Confirm password" }
                input #confirm_password type="password" name="confirm_password" required;
                (field_errors(errors, "confirm_password"))
                label for="role" { "Role (optional)" }
                input #role type="text" name="role" value=(form.role);
                p { button type="submit" { "Create account" } }
            }
            p { "Already registered? " a href="/auth/login" { "Log in" } }
        },
    )
}
