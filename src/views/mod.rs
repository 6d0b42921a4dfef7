//! Presentation layer: named templates rendered from a serializable context.
//!
//! Pages are delivered to the frontend inside the standard [`ApiResponse`]
//! envelope as `{ template, route, flashes, ...context }`; the frontend owns
//! the markup for each template name.

pub mod flash;
pub mod redirect;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::views::flash::FlashMessage;

#[derive(Debug, Serialize)]
pub struct View<C: Serialize> {
    pub template: &'static str,
    pub route: &'static str,
    pub flashes: Vec<FlashMessage>,
    #[serde(flatten)]
    pub context: C,
}

impl<C: Serialize> View<C> {
    pub fn new(route: &'static str, template: &'static str, context: C) -> Self {
        Self {
            template,
            route,
            flashes: Vec::new(),
            context,
        }
    }

    pub fn render(self, jar: CookieJar) -> Response {
        self.render_with_status(StatusCode::OK, jar)
    }

    /// Render, consuming any pending flash messages from `jar`.
    pub fn render_with_status(mut self, status: StatusCode, jar: CookieJar) -> Response {
        let (jar, flashes) = flash::take(jar);
        self.flashes = flashes;
        (status, jar, ApiResponse::success(self)).into_response()
    }
}
