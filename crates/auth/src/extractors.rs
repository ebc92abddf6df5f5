//! Axum extractors for authentication.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use gamestore_core::auth::Principal;

use crate::{AuthError, AuthState};

/// Extractor for an authenticated caller. Returns 401 if not authenticated.
pub struct CurrentUser(pub Principal);

/// Extractor for an authenticated admin. Returns 401 if not authenticated
/// and 403 if the caller is not an admin.
pub struct AdminUser(pub Principal);

fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    header
        .to_str()
        .map_err(|_| AuthError::InvalidToken("authorization header is not ASCII".to_string()))?
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MissingToken)
}

impl<S> FromRequestParts<S> for CurrentUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let token = bearer_token(parts)?;
        let principal = auth_state.tokens.validate(token)?;
        Ok(CurrentUser(principal))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(AuthError::AdminRequired);
        }
        Ok(AdminUser(principal))
    }
}
