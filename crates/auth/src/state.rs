//! Application state for auth.

use std::sync::Arc;

use axum::extract::FromRef;

use crate::config::AuthConfig;
use crate::tokens::TokenService;

/// Shared state for the auth extractors and login handlers.
#[derive(Clone)]
pub struct AuthState {
    pub config: AuthConfig,
    pub tokens: Arc<TokenService>,
}

impl AuthState {
    pub fn new(config: AuthConfig) -> Self {
        let tokens = Arc::new(TokenService::new(&config));
        Self { config, tokens }
    }
}

/// Allows AuthState to be extracted from a parent state.
impl<S> FromRef<S> for AuthState
where
    S: AsRef<AuthState>,
{
    fn from_ref(state: &S) -> Self {
        state.as_ref().clone()
    }
}
