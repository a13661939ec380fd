use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;
use uuid::Uuid;

use super::services::{session_id_from, session_user};
use crate::{error::AppError, state::AppState};

/// Resolves the session cookie to the logged-in user's id.
///
/// Missing, unknown or expired sessions are answered with a redirect to `/login`;
/// store failures with a 500.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let to_login = || Redirect::to("/login").into_response();

        let Some(session_id) = session_id_from(&parts.headers, &state.config.session) else {
            debug!(path = %parts.uri.path(), "no session cookie");
            return Err(to_login());
        };

        match session_user(state.store.as_ref(), session_id).await {
            Ok(Some(user_id)) => Ok(AuthUser(user_id)),
            Ok(None) => {
                debug!(%session_id, "unknown or expired session");
                Err(to_login())
            }
            Err(e) => Err(AppError::from(e.context("session lookup")).into_response()),
        }
    }
}
