//! One-shot flash messages carried across a redirect in a cookie.
//!
//! The cookie value is hex-encoded JSON so it never contains characters that
//! are illegal in a cookie value.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashCategory {
    Info,
    Success,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlashMessage {
    pub category: FlashCategory,
    pub message: String,
}

/// Queue a message for the next rendered view.
pub fn push(jar: CookieJar, category: FlashCategory, message: impl Into<String>) -> CookieJar {
    let mut messages = pending(&jar);
    messages.push(FlashMessage {
        category,
        message: message.into(),
    });
    let encoded = match serde_json::to_vec(&messages) {
        Ok(bytes) => hex::encode(bytes),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode flash messages");
            return jar;
        }
    };

    jar.add(
        Cookie::build((FLASH_COOKIE, encoded))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax),
    )
}

/// Consume pending messages, clearing the cookie if one was present.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FlashMessage>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let messages = pending(&jar);
    let jar = jar.remove(Cookie::build((FLASH_COOKIE, "")).path("/"));
    (jar, messages)
}

/// Messages currently stored in the jar; an undecodable cookie counts as empty.
pub fn pending(jar: &CookieJar) -> Vec<FlashMessage> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| hex::decode(c.value()).ok())
        .and_then(|bytes| serde_json::from_slice(&bytes).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_then_take_returns_messages_in_order() {
        let jar = push(CookieJar::new(), FlashCategory::Warning, "first");
        let jar = push(jar, FlashCategory::Danger, "second");

        let (jar, messages) = take(jar);
        assert_eq!(
            messages,
            vec![
                FlashMessage {
                    category: FlashCategory::Warning,
                    message: "first".to_string()
                },
                FlashMessage {
                    category: FlashCategory::Danger,
                    message: "second".to_string()
                },
            ]
        );
        assert!(pending(&jar).is_empty());
    }

    #[test]
    fn cookie_value_is_hex() {
        let jar = push(CookieJar::new(), FlashCategory::Info, "a \"quoted\"; value");
        let value = jar.get(FLASH_COOKIE).unwrap().value().to_string();
        assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn garbage_cookie_is_ignored() {
        let jar = CookieJar::new().add(Cookie::new(FLASH_COOKIE, "zz-not-hex"));
        assert!(pending(&jar).is_empty());
        let (_, messages) = take(jar);
        assert!(messages.is_empty());
    }

    #[test]
    fn take_without_cookie_is_a_no_op() {
        let (jar, messages) = take(CookieJar::new());
        assert!(messages.is_empty());
        assert!(jar.get(FLASH_COOKIE).is_none());
    }
}
