use std::time::Duration;

/// Secret used when `JWT_SECRET` is unset. Only suitable for local runs.
const DEV_SECRET: &str = "gamestore-development-secret-change-me";

/// Token issuing configuration.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub issuer: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: Duration::from_secs(60 * 60),
            issuer: "gamestore".to_string(),
        }
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for signing tokens (falls back to a development secret)
    /// - `JWT_TTL_MINUTES`: Token lifetime in minutes (default: 60)
    /// - `JWT_ISSUER`: Value of the `iss` claim (default: `gamestore`)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET not set, using the development secret");
                DEV_SECRET.to_string()
            }
        };

        let token_ttl = std::env::var("JWT_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(|minutes| Duration::from_secs(minutes * 60))
            .unwrap_or(Duration::from_secs(60 * 60));

        let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "gamestore".to_string());

        Self {
            jwt_secret,
            token_ttl,
            issuer,
        }
    }
}
