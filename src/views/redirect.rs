//! "Redirect back" support: return the user to where they came from.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, Query};
use axum::http::header::{HOST, REFERER};
use axum::http::request::Parts;
use axum::response::Redirect;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct NextParam {
    next: Option<String>,
}

/// Extractor capturing where a POST should land afterwards.
///
/// An explicit `?next=` wins over the `Referer` header; either is only used
/// when it points at this host. Otherwise the handler's fallback applies.
#[derive(Debug, Clone, Default)]
pub struct RedirectBack {
    target: Option<String>,
}

impl RedirectBack {
    pub fn to(self, fallback: &str) -> Redirect {
        Redirect::to(self.target.as_deref().unwrap_or(fallback))
    }

    #[cfg(test)]
    pub fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RedirectBack {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let host = parts.headers.get(HOST).and_then(|v| v.to_str().ok());
        let next = Query::<NextParam>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(p)| p.next);
        let referer = parts.headers.get(REFERER).and_then(|v| v.to_str().ok());

        let target = next
            .as_deref()
            .and_then(|n| local_path(n, host))
            .or_else(|| referer.and_then(|r| local_path(r, host)));

        Ok(Self { target })
    }
}

/// Reduce `target` to a path on this host, or `None` if it leaves the site.
///
/// Only printable ASCII without `\` is accepted: browsers drop tabs and
/// newlines and read `\` as `/`, and anything else cannot go in a `Location`
/// header.
pub fn local_path(target: &str, host: Option<&str>) -> Option<String> {
    let target = target.trim();
    if !target.bytes().all(|b| b.is_ascii_graphic() && b != b'\\') {
        return None;
    }
    if target.starts_with('/') {
        // "//evil.example" is protocol-relative, not a path.
        return (!target.starts_with("//")).then(|| target.to_string());
    }

    let rest = target
        .strip_prefix("https://")
        .or_else(|| target.strip_prefix("http://"))?;
    let (authority, path) = match rest.find(['/', '?', '#']) {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };
    if host? != authority {
        return None;
    }
    match path.chars().next() {
        Some('/') => Some(path.to_string()),
        Some(_) => Some(format!("/{path}")),
        None => Some("/".to_string()),
    }
}
