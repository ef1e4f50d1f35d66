//! One-shot notices carried across a redirect in a cookie.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use tower_cookies::{Cookie, Cookies};
use tracing::debug;

const FLASH_COOKIE: &str = "rentroll_flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Danger,
}

impl Level {
    pub fn css_class(&self) -> &'static str {
        match self {
            Level::Success => "flash flash-success",
            Level::Info => "flash flash-info",
            Level::Warning => "flash flash-warning",
            Level::Danger => "flash flash-danger",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Flash {
    pub level: Level,
    pub message: String,
}

impl Flash {
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

fn decode(value: &str) -> Option<Vec<Flash>> {
    let bytes = URL_SAFE_NO_PAD.decode(value).ok()?;
    serde_json::from_slice(&bytes).ok()
}

fn cookie(value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(FLASH_COOKIE, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}

/// Queue a notice for the next rendered page.
pub fn push(cookies: &Cookies, level: Level, message: impl Into<String>) {
    let mut pending = cookies
        .get(FLASH_COOKIE)
        .and_then(|c| decode(c.value()))
        .unwrap_or_default();
    pending.push(Flash::new(level, message));

    match serde_json::to_vec(&pending) {
        Ok(json) => cookies.add(cookie(URL_SAFE_NO_PAD.encode(json))),
        Err(e) => debug!(error = %e, "Dropping flash notice"),
    }
}

/// Drain queued notices. Unreadable cookies are discarded.
pub fn take(cookies: &Cookies) -> Vec<Flash> {
    let Some(current) = cookies.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    let flashes = decode(current.value()).unwrap_or_default();
    cookies.remove(cookie(String::new()));
    flashes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoded_notices_decode() {
        let flashes = vec![Flash::new(Level::Success, "Saved.")];
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&flashes).unwrap());
        assert_eq!(decode(&encoded), Some(flashes));
    }

    #[test]
    fn garbage_is_ignored() {
        assert_eq!(decode("%%%"), None);
        assert_eq!(decode(""), None);
    }
}
