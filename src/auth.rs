//! Password hashing, bearer sessions and role checks.

use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use std::sync::Arc;

use crate::constants::now_ms;
use crate::error::{ApiError, ApiResult};
use crate::models::{Role, User};
use crate::queries::sessions;
use crate::serve::AppState;

/// bcrypt hash of a password; runs on the blocking pool since high costs take a while
pub async fn hash_password(password: &str, cost: u32) -> ApiResult<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Compare a password against a stored bcrypt hash. A malformed hash never matches.
pub async fn verify_password(password: &str, hash: &str) -> ApiResult<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    let matched = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check task failed: {}", e)))?;
    Ok(matched.unwrap_or(false))
}

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// The signed-in account behind a request
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: String,
}

impl AuthUser {
    pub fn id(&self) -> &str {
        &self.user.id
    }

    pub fn role(&self) -> Role {
        self.user.role()
    }

    /// TEACHER or ADMIN
    pub fn require_teacher(&self) -> ApiResult<()> {
        match self.role() {
            Role::Teacher | Role::Admin => Ok(()),
            Role::User => Err(ApiError::Forbidden("Teacher access required".to_string())),
        }
    }

    pub fn require_admin(&self) -> ApiResult<()> {
        match self.role() {
            Role::Admin => Ok(()),
            _ => Err(ApiError::Forbidden("Admin access required".to_string())),
        }
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or_else(ApiError::unauthorized)?;
        let user: Option<User> =
            sqlx::query_as(&sessions::select_user_by_token(&token, now_ms()))
                .fetch_optional(&state.pool)
                .await?;
        match user {
            Some(user) => Ok(AuthUser { user, token }),
            None => Err(ApiError::unauthorized()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_hash_and_verify_password() {
        let a = hash_password("secret", 4).await.unwrap();
        let b = hash_password("secret", 4).await.unwrap();
        assert!(a.starts_with("$2b$04$"));
        // each hash carries its own salt
        assert_ne!(a, b);
        assert!(verify_password("secret", &a).await.unwrap());
        assert!(verify_password("secret", &b).await.unwrap());
        assert!(!verify_password("Secret", &a).await.unwrap());
    }

    #[tokio::test]
    async fn test_malformed_hash_never_matches() {
        assert!(!verify_password("secret", "not-a-bcrypt-hash").await.unwrap());
        assert!(!verify_password("", "").await.unwrap());
    }

    #[tokio::test]
    async fn test_cost_out_of_range_is_an_error() {
        let err = hash_password("secret", 2).await.unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bearer_token_parsing() {
        let (parts, _) = Request::builder()
            .header("Authorization", "Bearer abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts).as_deref(), Some("abc123"));

        let (parts, _) = Request::builder()
            .header("Authorization", "Basic abc123")
            .body(())
            .unwrap()
            .into_parts();
        assert!(bearer_token(&parts).is_none());

        let (parts, _) = Request::builder().body(()).unwrap().into_parts();
        assert!(bearer_token(&parts).is_none());
    }
}
