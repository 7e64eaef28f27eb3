//! Authentication manager

use anyhow::Result;

use super::jwt::{Claims, JwtError, create_token, validate_token};
use crate::core::config::AuthConfig;

/// Outcome of checking a token against the admin secret
#[derive(Debug)]
pub enum AdminCheck {
    Admin(Claims),
    /// Valid token that does not carry admin rights
    NotAdmin,
    Rejected(JwtError),
}

/// Holds the signing secrets for user and admin tokens
pub struct AuthManager {
    user_key: Option<Vec<u8>>,
    admin_key: Option<Vec<u8>>,
    token_ttl_secs: u64,
}

impl AuthManager {
    pub fn new(config: &AuthConfig) -> Self {
        let user_key = config.jwt_secret.as_ref().map(|s| s.as_bytes().to_vec());
        let admin_key = config.admin_secret().map(|s| s.as_bytes().to_vec());

        if user_key.is_some() {
            tracing::debug!(
                separate_admin_secret = config.admin_jwt_secret.is_some(),
                "Authentication enabled"
            );
        }

        Self {
            user_key,
            admin_key,
            token_ttl_secs: config.token_ttl_secs,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.user_key.is_some()
    }

    /// Mint a token; admin tokens are signed with the admin secret
    pub fn issue(&self, user_id: &str, email: Option<&str>, admin: bool) -> Result<String> {
        let key = if admin { &self.admin_key } else { &self.user_key };
        let key = key
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("No JWT secret configured"))?;
        create_token(key, &Claims::new(user_id, email, admin, self.token_ttl_secs))
    }

    /// Validate a user token. `None` when no secret is configured.
    pub fn validate_user(&self, token: &str) -> Option<Result<Claims, JwtError>> {
        let key = self.user_key.as_deref()?;
        Some(validate_token(token, key))
    }

    /// Validate an admin token. `None` when no secret is configured.
    pub fn validate_admin(&self, token: &str) -> Option<AdminCheck> {
        let key = self.admin_key.as_deref()?;
        let check = match validate_token(token, key) {
            Ok(claims) if claims.admin => AdminCheck::Admin(claims),
            Ok(_) => AdminCheck::NotAdmin,
            // Signed with the user secret: authenticated, but not an admin
            Err(JwtError::InvalidSignature)
                if matches!(self.validate_user(token), Some(Ok(_))) =>
            {
                AdminCheck::NotAdmin
            }
            Err(e) => AdminCheck::Rejected(e),
        };
        Some(check)
    }
}
