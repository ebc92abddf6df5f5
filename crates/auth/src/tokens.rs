//! Signed bearer tokens.

use std::time::Duration;

use chrono::{DateTime, Utc};
use gamestore_core::auth::Principal;
use gamestore_core::store::UserRole;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::error::AuthError;

/// Claims carried by an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub name: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Issues and validates HS256 tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
    issuer: String,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl: config.token_ttl,
            issuer: config.issuer.clone(),
        }
    }

    /// Issues a token for `principal`, valid from now.
    pub fn issue(&self, principal: &Principal) -> Result<String, AuthError> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as if signed at `now`.
    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: principal.user_id.to_string(),
            name: principal.username.clone(),
            role: principal.role,
            iat,
            exp: iat + self.ttl.as_secs() as i64,
            iss: self.issuer.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Validates a token's signature, issuer and expiry, returning its caller.
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        let user_id = data
            .claims
            .sub
            .parse::<i64>()
            .map_err(|_| AuthError::InvalidToken("subject is not a user id".to_string()))?;

        Ok(Principal {
            user_id,
            username: data.claims.name,
            role: data.claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&AuthConfig::new("test-secret"))
    }

    fn alice() -> Principal {
        Principal {
            user_id: 7,
            username: "alice".to_string(),
            role: UserRole::Admin,
        }
    }

    #[test]
    fn test_issue_then_validate_returns_principal() {
        let tokens = service();
        let token = tokens.issue(&alice()).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), alice());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let tokens = service();
        let long_ago = Utc::now() - chrono::Duration::hours(3);
        let token = tokens.issue_at(&alice(), long_ago).unwrap();

        assert!(matches!(tokens.validate(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = TokenService::new(&AuthConfig::new("another-secret"));
        let token = other.issue(&alice()).unwrap();

        assert!(matches!(
            service().validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_rejected() {
        let mut config = AuthConfig::new("test-secret");
        config.issuer = "someone-else".to_string();
        let token = TokenService::new(&config).issue(&alice()).unwrap();

        assert!(matches!(
            service().validate(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(matches!(
            service().validate("not.a.token"),
            Err(AuthError::InvalidToken(_))
        ));
    }
}
