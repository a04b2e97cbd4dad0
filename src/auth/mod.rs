use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Username of the token holder
    pub sub: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, expiry: Duration) -> Self {
        let now = Utc::now();

        Self {
            sub: username.into(),
            exp: (now + expiry).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Missing Authorization header")]
    Missing,

    #[error("Authorization header must use Bearer token format")]
    Malformed,

    #[error("Invalid JWT token: {0}")]
    Invalid(String),

    #[error("JWT generation error: {0}")]
    Encode(String),
}

/// A signed token together with its lifetime
#[derive(Debug, Clone, Serialize)]
pub struct IssuedToken {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
}

impl IssuedToken {
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// HS256 key material and expiry policy, built once from configuration
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expiry: Duration,
}

impl std::fmt::Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}

impl TokenKeys {
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            expiry,
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            security.jwt_secret.as_bytes(),
            Duration::hours(security.jwt_expiry_hours as i64),
        )
    }

    pub fn issue(&self, username: &str) -> Result<IssuedToken, JwtError> {
        let claims = Claims::new(username, self.expiry);
        let token = self.encode(&claims)?;

        Ok(IssuedToken {
            token,
            token_type: "Bearer",
            expires_in: self.expiry.num_seconds(),
        })
    }

    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::default(), claims, &self.encoding)
            .map_err(|e| JwtError::Encode(e.to_string()))
    }

    /// Verify signature and expiry, returning the claims of a usable token
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::default();
        validation.set_required_spec_claims(&["exp", "sub"]);
        // Expired means expired, no grace period
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| JwtError::Invalid(e.to_string()))?;

        if data.claims.sub.trim().is_empty() {
            return Err(JwtError::Invalid("token subject is empty".to_string()));
        }

        Ok(data.claims)
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, JwtError> {
    let header = header.ok_or(JwtError::Missing)?;
    let token = header.strip_prefix("Bearer ").ok_or(JwtError::Malformed)?.trim();

    if token.is_empty() {
        return Err(JwtError::Malformed);
    }
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys {
        TokenKeys::new(b"test-secret", Duration::hours(1))
    }

    #[test]
    fn issued_token_verifies_with_subject() {
        let keys = keys();
        let issued = keys.issue("alice").unwrap();

        assert_eq!(issued.expires_in, 3600);
        assert_eq!(issued.token_type, "Bearer");

        let claims = keys.verify(&issued.token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = keys();
        let claims = Claims::new("alice", Duration::hours(-2));
        let token = keys.encode(&claims).unwrap();

        assert!(matches!(keys.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn recently_expired_token_is_rejected() {
        let keys = keys();
        let token = keys.encode(&Claims::new("alice", Duration::seconds(-30))).unwrap();

        assert!(matches!(keys.verify(&token), Err(JwtError::Invalid(_))));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let other = TokenKeys::new(b"another-secret", Duration::hours(1));
        let token = other.issue("alice").unwrap().token;

        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn empty_subject_is_rejected() {
        let keys = keys();
        let token = keys.encode(&Claims::new("", Duration::hours(1))).unwrap();

        assert!(keys.verify(&token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(keys().verify("not.a.jwt").is_err());
    }

    #[test]
    fn bearer_header_parsing() {
        assert!(matches!(bearer_token(None), Err(JwtError::Missing)));
        assert!(matches!(bearer_token(Some("Token abc")), Err(JwtError::Malformed)));
        assert!(matches!(bearer_token(Some("Bearer   ")), Err(JwtError::Malformed)));
        assert_eq!(bearer_token(Some("Bearer abc.def")).unwrap(), "abc.def");
    }
}
