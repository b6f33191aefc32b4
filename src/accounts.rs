use log::{info, warn};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::auth::{hash_password, verify_password};
use crate::config::AdminConfig;
use crate::constants::{generate_id, now_ms};
use crate::error::{is_unique_violation, ApiError, ApiResult, DynError};
use crate::models::{Role, StudentSummary, User, UserCredentials};
use crate::queries::{sessions, users};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_at_ms: i64,
    pub user: User,
}

/// Trim and lowercase so lookups are case-insensitive
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn find_user(pool: &SqlitePool, user_id: &str) -> ApiResult<User> {
    sqlx::query_as(&users::select_by_id(user_id))
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::not_found("User"))
}

async fn insert_user(
    pool: &SqlitePool,
    name: &str,
    email: &str,
    password: &str,
    role: Role,
    password_cost: u32,
) -> ApiResult<User> {
    let id = generate_id("usr");
    let hash = hash_password(password, password_cost).await?;
    let sql = users::insert(&id, name, email, Some(&hash), role.as_str(), now_ms());
    match sqlx::query(&sql).execute(pool).await {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(ApiError::Conflict(
                "This email is already registered.".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    }
    find_user(pool, &id).await
}

/// Create a learner account
pub async fn register(pool: &SqlitePool, req: &RegisterRequest, password_cost: u32) -> ApiResult<User> {
    let name = req.name.trim();
    let email = normalize_email(&req.email);
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Please fill in all fields."));
    }
    if !email.contains('@') {
        return Err(ApiError::bad_request("Please enter a valid email address."));
    }

    let user = insert_user(pool, name, &email, &req.password, Role::User, password_cost).await?;
    info!("Registered user {} ({})", user.id, user.email);
    Ok(user)
}

/// Absolute expiry of a session issued at `now`
fn session_expiry_ms(now: i64, ttl_hours: i64) -> ApiResult<i64> {
    ttl_hours
        .checked_mul(3_600_000)
        .and_then(|ttl_ms| now.checked_add(ttl_ms))
        .ok_or_else(|| ApiError::Internal(format!("Session lifetime of {} hours is out of range", ttl_hours)))
}

/// Check credentials and issue a bearer session
pub async fn login(pool: &SqlitePool, req: &LoginRequest, ttl_hours: i64) -> ApiResult<LoginResponse> {
    let email = normalize_email(&req.email);
    if email.is_empty() || req.password.is_empty() {
        return Err(ApiError::bad_request("Please enter both email and password."));
    }

    let creds: Option<UserCredentials> = sqlx::query_as(&users::select_credentials_by_email(&email))
        .fetch_optional(pool)
        .await?;
    let (user_id, hash) = match creds {
        Some(UserCredentials {
            id,
            password_hash: Some(hash),
        }) => (id, hash),
        _ => {
            return Err(ApiError::Unauthorized(
                "No account found with this email.".to_string(),
            ))
        }
    };
    if !verify_password(&req.password, &hash).await? {
        return Err(ApiError::Unauthorized("Incorrect password.".to_string()));
    }

    let now = now_ms();
    let expires_at_ms = session_expiry_ms(now, ttl_hours)?;
    let token = Uuid::new_v4().to_string();
    sqlx::query(&sessions::insert(&token, &user_id, now, expires_at_ms))
        .execute(pool)
        .await?;
    sqlx::query(&sessions::delete_expired(now)).execute(pool).await?;

    let user = find_user(pool, &user_id).await?;
    Ok(LoginResponse {
        token,
        expires_at_ms,
        user,
    })
}

pub async fn logout(pool: &SqlitePool, token: &str) -> ApiResult<()> {
    sqlx::query(&sessions::delete_by_token(token))
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_profile(pool: &SqlitePool, user_id: &str, name: &str) -> ApiResult<User> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("Name must not be empty"));
    }
    sqlx::query(&users::update_name(user_id, name))
        .execute(pool)
        .await?;
    find_user(pool, user_id).await
}

pub async fn list_students(pool: &SqlitePool) -> ApiResult<Vec<StudentSummary>> {
    Ok(sqlx::query_as(&users::select_students_with_course_count())
        .fetch_all(pool)
        .await?)
}

pub async fn set_role(pool: &SqlitePool, user_id: &str, role: Role) -> ApiResult<User> {
    let result = sqlx::query(&users::update_role(user_id, role.as_str()))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("User"));
    }
    info!("User {} is now {}", user_id, role.as_str());
    find_user(pool, user_id).await
}

/// Create the configured admin account, or promote it if it already exists
pub async fn ensure_admin(
    pool: &SqlitePool,
    admin: &AdminConfig,
    password: &str,
    password_cost: u32,
) -> Result<User, DynError> {
    let email = normalize_email(&admin.email);
    let existing: Option<User> = sqlx::query_as(&users::select_by_email(&email))
        .fetch_optional(pool)
        .await?;

    match existing {
        Some(user) if user.role() == Role::Admin => Ok(user),
        Some(user) => {
            warn!("Promoting existing account {} to ADMIN", email);
            Ok(set_role(pool, &user.id, Role::Admin).await?)
        }
        None => {
            let name = admin.name.as_deref().unwrap_or("Administrator");
            let user = insert_user(pool, name, &email, password, Role::Admin, password_cost).await?;
            info!("Created admin account {}", email);
            Ok(user)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Jane.Doe@Example.COM "), "jane.doe@example.com");
    }

    #[test]
    fn test_session_expiry_ms() {
        assert_eq!(session_expiry_ms(1_000, 2).unwrap(), 1_000 + 7_200_000);
        assert!(session_expiry_ms(1_000, i64::MAX / 1_000).is_err());
        assert!(session_expiry_ms(i64::MAX - 10, 1).is_err());
    }
}
