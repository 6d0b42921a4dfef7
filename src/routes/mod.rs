//! Route definitions for the findcat service.

pub mod auth;
pub mod findings;
pub mod health;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Build the complete application router.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/users", post(auth::create_user))
        .route("/auth/me", get(auth::me));

    let finding_routes = Router::new()
        .route("/findings", get(findings::index))
        .route(
            "/findings/new",
            get(findings::new_form).post(findings::create),
        )
        .route(
            "/findings/{finding_id}",
            get(findings::edit_form).post(findings::update),
        )
        .route("/findings/{finding_id}/delete", post(findings::delete))
        .route(
            "/findings/{finding_id}/add_translation",
            get(findings::add_translation_form).post(findings::add_translation),
        )
        .route(
            "/findings/{finding_id}/delete/{language}",
            post(findings::delete_translation),
        )
        .route(
            "/findings/{finding_id}/edit/{language}",
            get(findings::edit_translation_form).post(findings::edit_translation),
        )
        .route(
            "/findings/{finding_id}/add_solution",
            get(findings::add_solution_form).post(findings::add_solution),
        )
        .route(
            "/findings/{finding_id}/solution/{name}/delete",
            post(findings::delete_solution),
        )
        .route(
            "/findings/{finding_id}/solution/{name}",
            get(findings::edit_solution_form).post(findings::edit_solution),
        );

    let cors = cors_layer(&state.config.frontend_url);
    let body_limit = RequestBodyLimitLayer::new(state.config.max_form_bytes);

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", auth_routes)
        .merge(finding_routes)
        .layer(body_limit)
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Allow the configured frontend origin, with cookies so flash messages survive redirects.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([AUTHORIZATION, CONTENT_TYPE])
            .allow_credentials(true),
        Err(e) => {
            tracing::warn!(error = %e, frontend_url, "Invalid FRONTEND_URL, cross-origin requests disabled");
            CorsLayer::new()
        }
    }
}
