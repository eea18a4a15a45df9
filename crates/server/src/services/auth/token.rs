//! Signed login tokens (HS256 JWT).

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use lead_tracker_core::AdminId;

use super::AuthError;
use crate::config::AuthConfig;
use crate::models::CurrentAdmin;

/// Claims embedded in every login token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Admin id.
    pub sub: i32,
    pub username: String,
    /// Issued-at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

/// Issue a token for `admin`, valid for the configured TTL.
///
/// # Errors
///
/// Returns `AuthError::TokenExpiryOutOfRange` if the TTL pushes the expiry past
/// the representable date range, or `AuthError::TokenSigning` if encoding fails.
pub fn issue_token(admin: &CurrentAdmin, config: &AuthConfig) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = Claims {
        sub: admin.id.as_i32(),
        username: admin.username.clone(),
        iat: now.timestamp(),
        exp: now
            .checked_add_signed(config.token_ttl)
            .ok_or(AuthError::TokenExpiryOutOfRange)?
            .timestamp(),
    };

    let key = EncodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());
    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &key)
        .map_err(AuthError::TokenSigning)
}

/// Verify signature and expiry, returning the embedded identity.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` for any malformed, tampered, or expired token.
pub fn verify_token(token: &str, config: &AuthConfig) -> Result<CurrentAdmin, AuthError> {
    let key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["sub", "exp"]);

    jsonwebtoken::decode::<Claims>(token, &key, &validation)
        .map(|data| CurrentAdmin {
            id: AdminId::new(data.claims.sub),
            username: data.claims.username,
        })
        .map_err(AuthError::InvalidToken)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Duration;
    use secrecy::SecretString;

    use super::*;

    fn config(ttl: Duration) -> AuthConfig {
        AuthConfig {
            jwt_secret: SecretString::from("kX9#mQ2$vL7@pR4&nW8*jT3!hY6^bF1%"),
            token_ttl: ttl,
        }
    }

    fn alice() -> CurrentAdmin {
        CurrentAdmin {
            id: AdminId::new(7),
            username: "alice".to_owned(),
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config(Duration::days(7));
        let token = issue_token(&alice(), &config).unwrap();
        assert_eq!(verify_token(&token, &config).unwrap(), alice());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = config(Duration::seconds(-60));
        let token = issue_token(&alice(), &config).unwrap();

        let err = verify_token(&token, &config).unwrap_err();
        assert!(err.is_expired());
    }

    #[test]
    fn test_unrepresentable_expiry_is_an_error() {
        let config = config(Duration::days(1_000_000_000));
        assert!(matches!(
            issue_token(&alice(), &config),
            Err(AuthError::TokenExpiryOutOfRange)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issue_token(&alice(), &config(Duration::days(7))).unwrap();
        let other = AuthConfig {
            jwt_secret: SecretString::from("zP5&wQ8!eR2#tY7$uI4@oA9*sD3^fG6%"),
            token_ttl: Duration::days(7),
        };

        let err = verify_token(&token, &other).unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
        assert!(!err.is_expired());
    }

    #[test]
    fn test_garbage_token_rejected() {
        let config = config(Duration::days(7));
        assert!(verify_token("not.a.jwt", &config).is_err());
        assert!(verify_token("", &config).is_err());
    }
}
