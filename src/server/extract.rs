//! Request extractors.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::core::error::AuthError;
use crate::core::identity::Identity;
use crate::server::AppState;

/// The authenticated caller, resolved from the `Authorization: Bearer` header.
///
/// Handlers that take a `Requester` are unreachable without a valid token; a
/// missing header is 401 and a rejected token is 403.
pub struct Requester(pub Identity);

impl FromRequestParts<AppState> for Requester {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        let identity = state.identity.authenticate(token).await?;
        Ok(Requester(identity))
    }
}
