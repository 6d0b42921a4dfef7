//! Request-scoped context: the authenticated user plus the request's transaction.

use axum::{extract::FromRequestParts, http::request::Parts};
use sqlx::{PgConnection, Postgres, Transaction};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

/// Handed to every catalog handler. Authentication is checked before the
/// transaction is opened. The handler commits on success; dropping the
/// context without committing rolls everything back.
pub struct RequestContext {
    pub user: CurrentUser,
    tx: Transaction<'static, Postgres>,
}

impl RequestContext {
    /// The transaction's connection, for passing to services.
    pub fn conn(&mut self) -> &mut PgConnection {
        &mut *self.tx
    }

    pub async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        let tx = state.db.begin().await?;
        Ok(RequestContext { user, tx })
    }
}
