//! Bearer-token extractors for Axum handlers
//!
//! The [`AuthManager`] is read from request extensions, installed by the
//! server as an `Extension<Arc<AuthManager>>` layer.
//!
//! ```no_run
//! # use nestmate_server::api::auth::AuthUser;
//! # use nestmate_server::api::types::ApiError;
//! pub async fn my_listings(user: AuthUser) -> Result<(), ApiError> {
//!     let _owner = user.user_id;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::jwt::JwtError;
use super::manager::{AdminCheck, AuthManager};
use crate::api::types::ApiError;

/// Authenticated caller
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
}

/// Authenticated caller holding admin rights
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: String,
}

// ============================================================================
// Helper Functions
// ============================================================================

fn manager(parts: &Parts) -> Result<Arc<AuthManager>, ApiError> {
    let manager = parts
        .extensions
        .get::<Arc<AuthManager>>()
        .cloned()
        .ok_or_else(|| ApiError::internal("Auth manager not available"))?;
    if !manager.is_configured() {
        return Err(ApiError::service_unavailable(
            "Authentication is not configured on this server",
        ));
    }
    Ok(manager)
}

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("MISSING_TOKEN", "Authorization header required"))?;

    header
        .to_str()
        .ok()
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            ApiError::unauthorized("INVALID_TOKEN", "Authorization header must be 'Bearer <token>'")
        })
}

fn rejected(e: JwtError) -> ApiError {
    tracing::debug!(error = %e, "Token rejected");
    match e {
        JwtError::Expired => ApiError::unauthorized("TOKEN_EXPIRED", e.to_string()),
        _ => ApiError::unauthorized("INVALID_TOKEN", e.to_string()),
    }
}

// ============================================================================
// Extractors
// ============================================================================

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let manager = manager(parts)?;
        let token = bearer_token(parts)?;

        match manager.validate_user(token) {
            Some(Ok(claims)) => Ok(Self {
                user_id: claims.sub,
                email: claims.email,
            }),
            Some(Err(e)) => Err(rejected(e)),
            None => Err(ApiError::service_unavailable(
                "Authentication is not configured on this server",
            )),
        }
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let manager = manager(parts)?;
        let token = bearer_token(parts)?;

        match manager.validate_admin(token) {
            Some(AdminCheck::Admin(claims)) => Ok(Self {
                user_id: claims.sub,
            }),
            Some(AdminCheck::NotAdmin) => Err(ApiError::forbidden(
                "ADMIN_REQUIRED",
                "Administrator access required",
            )),
            Some(AdminCheck::Rejected(e)) => Err(rejected(e)),
            None => Err(ApiError::service_unavailable(
                "Authentication is not configured on this server",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AuthConfig;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn manager() -> Arc<AuthManager> {
        Arc::new(AuthManager::new(&AuthConfig {
            jwt_secret: Some("user-secret-0123456789".to_string()),
            admin_jwt_secret: None,
            token_ttl_secs: 60,
        }))
    }

    fn parts(manager: &Arc<AuthManager>, auth: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/");
        if let Some(auth) = auth {
            builder = builder.header(AUTHORIZATION, auth);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        parts.extensions.insert(Arc::clone(manager));
        parts
    }

    fn status(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn test_missing_header_is_401() {
        let m = manager();
        let err = AuthUser::from_request_parts(&mut parts(&m, None), &())
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_scheme_is_401() {
        let m = manager();
        let err = AuthUser::from_request_parts(&mut parts(&m, Some("Basic abc")), &())
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_user_token() {
        let m = manager();
        let token = m.issue("u1", Some("u1@example.com"), false).unwrap();
        let header = format!("Bearer {}", token);
        let user = AuthUser::from_request_parts(&mut parts(&m, Some(&header)), &())
            .await
            .unwrap();
        assert_eq!(user.user_id, "u1");
        assert_eq!(user.email.as_deref(), Some("u1@example.com"));
    }

    #[tokio::test]
    async fn test_user_token_on_admin_is_403() {
        let m = manager();
        let header = format!("Bearer {}", m.issue("u1", None, false).unwrap());
        let err = AdminUser::from_request_parts(&mut parts(&m, Some(&header)), &())
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::FORBIDDEN);

        let header = format!("Bearer {}", m.issue("root", None, true).unwrap());
        let admin = AdminUser::from_request_parts(&mut parts(&m, Some(&header)), &())
            .await
            .unwrap();
        assert_eq!(admin.user_id, "root");
    }

    #[tokio::test]
    async fn test_unconfigured_is_503() {
        let m = Arc::new(AuthManager::new(&AuthConfig {
            jwt_secret: None,
            admin_jwt_secret: None,
            token_ttl_secs: 60,
        }));
        let err = AuthUser::from_request_parts(&mut parts(&m, Some("Bearer x")), &())
            .await
            .unwrap_err();
        assert_eq!(status(err), StatusCode::SERVICE_UNAVAILABLE);
    }
}
