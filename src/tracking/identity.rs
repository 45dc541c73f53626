//! Anonymous visitor identity carried in the `sts` cookie

use axum::http::{header, HeaderMap, HeaderValue};
use uuid::Uuid;

/// Name of the cookie holding the visitor's identity token.
pub const IDENTITY_COOKIE: &str = "sts";

/// Expiry written on issued cookies. Far enough out to never lapse.
pub const COOKIE_EXPIRES: &str = "Wed, 01 Jan 3000 01:00:00 GMT";

/// The user id a beacon request is recorded under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    /// True when the id was minted for this request and must be handed back
    /// to the browser.
    pub issued: bool,
}

impl Identity {
    /// Reuse the visitor's `sts` cookie verbatim, or mint a fresh v4 UUID.
    ///
    /// Any non-empty token is accepted as-is; there is no format check.
    pub fn resolve(headers: &HeaderMap) -> Self {
        match read_cookie(headers, IDENTITY_COOKIE) {
            Some(token) => Self {
                user_id: token.to_string(),
                issued: false,
            },
            None => Self {
                user_id: Uuid::new_v4().to_string(),
                issued: true,
            },
        }
    }

    /// `Set-Cookie` value to emit, only on first contact.
    pub fn set_cookie(&self) -> Option<HeaderValue> {
        if !self.issued {
            return None;
        }

        let cookie = format!(
            "{IDENTITY_COOKIE}={}; Path=/; Expires={COOKIE_EXPIRES}",
            self.user_id
        );
        HeaderValue::from_str(&cookie).ok()
    }
}

/// First non-empty value of cookie `name` across all `Cookie` headers.
/// The raw value is returned as sent, surrounding quotes included.
fn read_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}
