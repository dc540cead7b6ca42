//! # User Commands
//!
//! User accounts and the activity log.
//!
//! ## Write Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    User Writes                                          │
//! │                                                                         │
//! │  input ──► validate ──► hash password (argon2, salted PHC string)       │
//! │                              │                                          │
//! │                              ▼                                          │
//! │            BEGIN                                                        │
//! │              users:    insert / update / delete                         │
//! │              activity: append create / update / delete / login entry    │
//! │            COMMIT                                                       │
//! │                                                                         │
//! │  Plain-text passwords never reach the store.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use serde::Deserialize;
use tracing::{error, info, warn};

use super::ApiResult;
use crate::context::AppContext;
use crate::error::ApiError;
use storage_core::filter::newest_activity_first;
use storage_core::validation::{validate_password, validate_user};
use storage_core::{ActivityKind, ActivityLogEntry, Collection, User, UserRole, UserStatus};

// ===== Inputs =====

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub full_name: String,
    pub email: String,
    /// Plain text; hashed before storing.
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Profile edit. `password: None` keeps the current hash.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub full_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

// ===== Password hashing =====

/// Hashes `password` into a salted PHC string.
pub fn hash_password(password: &str) -> ApiResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Password hashing failed: {}", e);
            ApiError::internal("Password hashing failed")
        })
}

/// Checks `candidate` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify_password(stored_hash: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            warn!("Stored password hash is malformed: {}", e);
            false
        }
    }
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// ===== Queries =====

pub async fn list_users(ctx: &AppContext) -> ApiResult<Vec<User>> {
    Ok(ctx.db().records::<User>().all().await?)
}

pub async fn get_user(ctx: &AppContext, id: i64) -> ApiResult<User> {
    Ok(ctx.db().records::<User>().require(id).await?)
}

async fn find_by_username(ctx: &AppContext, username: &str) -> ApiResult<Option<User>> {
    let wanted = username.trim();
    Ok(list_users(ctx)
        .await?
        .into_iter()
        .find(|u| u.username.eq_ignore_ascii_case(wanted)))
}

/// Activity log, newest first.
pub async fn activity_log(ctx: &AppContext) -> ApiResult<Vec<ActivityLogEntry>> {
    let mut entries = ctx.db().records::<ActivityLogEntry>().all().await?;
    newest_activity_first(&mut entries);
    Ok(entries)
}

// ===== Writes =====

pub async fn create_user(ctx: &AppContext, input: NewUser) -> ApiResult<User> {
    validate_password(&input.password)?;

    let now = Utc::now();
    let mut user = User {
        id: None,
        username: input.username.trim().to_string(),
        full_name: input.full_name.trim().to_string(),
        email: input.email.trim().to_string(),
        password: String::new(),
        role: input.role,
        status: UserStatus::Active,
        phone: blank_to_none(input.phone),
        department: blank_to_none(input.department),
        created_at: Some(now),
        last_login: None,
    };
    validate_user(&user)?;

    if find_by_username(ctx, &user.username).await?.is_some() {
        return Err(ApiError::validation(format!(
            "username '{}' already exists",
            user.username
        )));
    }
    user.password = hash_password(&input.password)?;

    let mut tx = ctx.db().store().transaction().await?;
    let user = tx.create_record(&user).await?;
    tx.create_record(&ActivityLogEntry::new(
        ActivityKind::Create,
        format!("User {} created", user.username),
        user.id,
        now,
    ))
    .await?;
    tx.commit().await?;

    info!(id = user.id, username = %user.username, role = ?user.role, "User created");
    Ok(user)
}

pub async fn update_user(ctx: &AppContext, id: i64, input: UserUpdate) -> ApiResult<User> {
    let mut user = get_user(ctx, id).await?;
    user.full_name = input.full_name.trim().to_string();
    user.email = input.email.trim().to_string();
    user.role = input.role;
    user.status = input.status;
    user.phone = blank_to_none(input.phone);
    user.department = blank_to_none(input.department);
    validate_user(&user)?;

    if let Some(password) = input.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        user.password = hash_password(&password)?;
    }

    let mut tx = ctx.db().store().transaction().await?;
    tx.update_record(id, &user).await?;
    tx.create_record(&ActivityLogEntry::new(
        ActivityKind::Update,
        format!("User {} updated", user.username),
        Some(id),
        Utc::now(),
    ))
    .await?;
    tx.commit().await?;

    info!(id, "User updated");
    Ok(user)
}

pub async fn delete_user(ctx: &AppContext, id: i64) -> ApiResult<()> {
    let user = get_user(ctx, id).await?;

    let mut tx = ctx.db().store().transaction().await?;
    tx.delete(Collection::Users, id).await?;
    tx.create_record(&ActivityLogEntry::new(
        ActivityKind::Delete,
        format!("User {} deleted", user.username),
        Some(id),
        Utc::now(),
    ))
    .await?;
    tx.commit().await?;

    info!(id, username = %user.username, "User deleted");
    Ok(())
}

/// Stamps `lastLogin` and appends a `login` activity entry.
pub async fn record_login(ctx: &AppContext, id: i64) -> ApiResult<User> {
    let mut user = get_user(ctx, id).await?;
    let now = Utc::now();
    user.last_login = Some(now);

    let mut tx = ctx.db().store().transaction().await?;
    tx.update_record(id, &user).await?;
    tx.create_record(&ActivityLogEntry::new(
        ActivityKind::Login,
        format!("User {} logged in", user.username),
        Some(id),
        now,
    ))
    .await?;
    tx.commit().await?;

    info!(id, "Login recorded");
    Ok(user)
}

/// Checks credentials for an active user and records the login.
///
/// Unknown user and wrong password give the same error.
pub async fn login(ctx: &AppContext, username: &str, password: &str) -> ApiResult<User> {
    let invalid = || ApiError::validation("Invalid username or password");

    let user = find_by_username(ctx, username).await?.ok_or_else(invalid)?;
    if !verify_password(&user.password, password) {
        warn!(username = %user.username, "Failed login attempt");
        return Err(invalid());
    }
    if user.status != UserStatus::Active {
        return Err(ApiError::validation("User account is not active"));
    }

    let id = user.id.ok_or_else(|| ApiError::internal("Stored user has no id"))?;
    record_login(ctx, id).await
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::test_support::test_context;

    fn new_user(username: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            full_name: "Anna Petrova".to_string(),
            email: "anna@example.com".to_string(),
            password: "secret123".to_string(),
            role: UserRole::Manager,
            phone: None,
            department: Some(" ".to_string()),
        }
    }

    #[test]
    fn test_hash_is_salted_and_verifies() {
        let a = hash_password("secret123").unwrap();
        let b = hash_password("secret123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
        assert!(verify_password(&a, "secret123"));
        assert!(!verify_password(&a, "secret124"));
        assert!(!verify_password("plain-text", "plain-text"));
    }

    #[tokio::test]
    async fn test_create_stores_hash_and_logs_activity() {
        let ctx = test_context().await;
        let user = create_user(&ctx, new_user("anna")).await.unwrap();

        assert_ne!(user.password, "secret123");
        assert_eq!(user.department, None);
        let stored = get_user(&ctx, user.id.unwrap()).await.unwrap();
        assert!(verify_password(&stored.password, "secret123"));

        let log = activity_log(&ctx).await.unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].kind, ActivityKind::Create);
        assert_eq!(log[0].actor, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let ctx = test_context().await;
        create_user(&ctx, new_user("anna")).await.unwrap();
        let err = create_user(&ctx, new_user("ANNA")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(list_users(&ctx).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_login_records_and_orders_activity() {
        let ctx = test_context().await;
        let user = create_user(&ctx, new_user("anna")).await.unwrap();

        assert!(login(&ctx, "anna", "wrong-pass").await.is_err());
        let logged_in = login(&ctx, "anna", "secret123").await.unwrap();
        assert!(logged_in.last_login.is_some());

        let log = activity_log(&ctx).await.unwrap();
        let kinds: Vec<_> = log.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![ActivityKind::Login, ActivityKind::Create]);

        update_user(
            &ctx,
            user.id.unwrap(),
            UserUpdate {
                full_name: "Anna P.".into(),
                email: "anna@example.com".into(),
                role: UserRole::Admin,
                status: UserStatus::Inactive,
                phone: None,
                department: None,
                password: None,
            },
        )
        .await
        .unwrap();
        let err = login(&ctx, "anna", "secret123").await.unwrap_err();
        assert!(err.message.contains("not active"));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let ctx = test_context().await;
        let user = create_user(&ctx, new_user("anna")).await.unwrap();
        delete_user(&ctx, user.id.unwrap()).await.unwrap();

        assert!(list_users(&ctx).await.unwrap().is_empty());
        assert_eq!(activity_log(&ctx).await.unwrap()[0].kind, ActivityKind::Delete);
        assert_eq!(
            delete_user(&ctx, user.id.unwrap()).await.unwrap_err().code,
            ErrorCode::NotFound
        );
    }
}
