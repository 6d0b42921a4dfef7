//! Role gate for account management.
//!
//! Catalog pages are open to every signed-in role (Admin, Manager, Auditor);
//! only an Admin may create accounts.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserRole;
use crate::AppState;

/// Signed-in user holding [`UserRole::Admin`]; anyone else gets 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != UserRole::Admin {
            return Err(AppError::Forbidden(
                "Only an Admin can manage catalog users".to_string(),
            ));
        }
        Ok(RequireAdmin(user))
    }
}
