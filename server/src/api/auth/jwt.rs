//! JWT bearer token handling

use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT validation error
#[derive(Debug, PartialEq, Eq)]
pub enum JwtError {
    /// Token has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Token has expired"),
            Self::InvalidSignature => write!(f, "Invalid token signature"),
            Self::Invalid(msg) => write!(f, "Invalid token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// Claims carried by user and admin tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub admin: bool,
}

impl Claims {
    pub fn new(user_id: &str, email: Option<&str>, admin: bool, ttl_secs: u64) -> Self {
        let now = Utc::now();
        let exp = now + Duration::seconds(ttl_secs.min(i64::MAX as u64) as i64);

        Self {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            admin,
        }
    }
}

/// Create a signed HS256 token
pub fn create_token(signing_key: &[u8], claims: &Claims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode an HS256 token
pub fn validate_token(token: &str, signing_key: &[u8]) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"0123456789abcdef0123456789abcdef";

    #[test]
    fn test_create_and_validate() {
        let claims = Claims::new("user-1", Some("a@example.com"), false, 60);
        let token = create_token(KEY, &claims).unwrap();
        let decoded = validate_token(&token, KEY).unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.email.as_deref(), Some("a@example.com"));
        assert!(!decoded.admin);
    }

    #[test]
    fn test_admin_flag_round_trips() {
        let token = create_token(KEY, &Claims::new("root", None, true, 60)).unwrap();
        assert!(validate_token(&token, KEY).unwrap().admin);
    }

    #[test]
    fn test_invalid_signature() {
        let token = create_token(KEY, &Claims::new("user-1", None, false, 60)).unwrap();
        assert_eq!(
            validate_token(&token, b"another-secret-another-secret").unwrap_err(),
            JwtError::InvalidSignature
        );
    }

    #[test]
    fn test_expired() {
        let mut claims = Claims::new("user-1", None, false, 60);
        claims.iat -= 7200;
        claims.exp -= 3600;
        let token = create_token(KEY, &claims).unwrap();
        assert_eq!(validate_token(&token, KEY).unwrap_err(), JwtError::Expired);
    }

    #[test]
    fn test_garbage_token() {
        assert!(matches!(
            validate_token("not-a-jwt", KEY),
            Err(JwtError::Invalid(_))
        ));
    }
}
