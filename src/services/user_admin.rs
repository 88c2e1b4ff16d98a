//! User administration: single-admin rule, activation and role changes.

use sea_orm::ConnectionTrait;
use tracing::info;

use crate::db::{self, DbPool};
use crate::entity::user;
use crate::error::{AppError, AppResult};
use crate::models::{Actor, CreateUserRequest, Role, UpdateUserRequest};

pub const ADMIN_EXISTS_MSG: &str = "An admin account already exists";

/// Create a user on behalf of an admin.
pub async fn create_user(
    pool: &DbPool,
    actor: &Actor,
    req: &CreateUserRequest,
) -> AppResult<user::Model> {
    if !actor.is_admin() {
        return Err(AppError::Forbidden("Only admins can create users".to_string()));
    }
    let created = insert_user(pool.connection(), req).await?;
    info!("User {} ({}) created by user {}", created.id, created.role, actor.id);
    Ok(created)
}

/// Create the admin account. Used by the bootstrap CLI.
pub async fn bootstrap_admin(
    pool: &DbPool,
    username: &str,
    email: &str,
    password_hash: &str,
) -> AppResult<user::Model> {
    let req = CreateUserRequest {
        username: username.to_string(),
        email: email.to_string(),
        password_hash: password_hash.to_string(),
        role: Role::Admin,
        department: None,
    };
    insert_user(pool.connection(), &req).await
}

/// Validate and insert a user, keeping at most one admin.
///
/// The pre-check gives a readable conflict; the partial unique index on
/// `users(role)` catches a racing insert, which maps to the same conflict.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    req: &CreateUserRequest,
) -> AppResult<user::Model> {
    if req.username.trim().is_empty() {
        return Err(AppError::InvalidInput("Username is required".to_string()));
    }
    if !req.email.contains('@') {
        return Err(AppError::InvalidInput("A valid email is required".to_string()));
    }
    if req.password_hash.is_empty() {
        return Err(AppError::InvalidInput("Password hash is required".to_string()));
    }

    if req.role == Role::Admin && db::users::find_admin(db).await?.is_some() {
        return Err(AppError::Conflict(ADMIN_EXISTS_MSG.to_string()));
    }

    match db::users::insert(db, req).await {
        Err(AppError::Conflict(_)) => {
            Err(unique_conflict(db, req.role == Role::Admin, None).await)
        }
        other => other,
    }
}

/// Name the uniqueness rule a write broke. An admin-role write only hit the
/// single-admin index if some other user is now the admin.
async fn unique_conflict<C: ConnectionTrait>(
    db: &C,
    wants_admin: bool,
    writer: Option<i32>,
) -> AppError {
    if wants_admin
        && let Ok(Some(admin)) = db::users::find_admin(db).await
        && Some(admin.id) != writer
    {
        return AppError::Conflict(ADMIN_EXISTS_MSG.to_string());
    }
    AppError::Conflict("Username or email already exists".to_string())
}

/// Update a user. Admins may update anyone; others only themselves and never
/// their role.
pub async fn update_user(
    pool: &DbPool,
    actor: &Actor,
    user_id: i32,
    req: &UpdateUserRequest,
) -> AppResult<user::Model> {
    if !actor.is_admin() && (actor.id != user_id || req.role.is_some()) {
        return Err(AppError::Forbidden(
            "Only admins can change other users or roles".to_string(),
        ));
    }

    let conn = pool.connection();
    let existing = db::users::get(conn, user_id).await?;

    if req.role == Some(Role::Admin)
        && existing.role != Role::Admin.as_str()
        && db::users::find_admin(conn).await?.is_some()
    {
        return Err(AppError::Conflict(ADMIN_EXISTS_MSG.to_string()));
    }

    match db::users::update(conn, user_id, req).await {
        Err(AppError::Conflict(_)) => {
            Err(unique_conflict(conn, req.role == Some(Role::Admin), Some(user_id)).await)
        }
        other => other,
    }
}

/// Flip a user's active flag. Nobody deactivates themselves or the admin.
pub async fn toggle_active(pool: &DbPool, actor: &Actor, user_id: i32) -> AppResult<user::Model> {
    if !actor.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can activate or deactivate users".to_string(),
        ));
    }
    if actor.id == user_id {
        return Err(AppError::Forbidden(
            "You cannot deactivate your own account".to_string(),
        ));
    }

    let conn = pool.connection();
    let target = db::users::get(conn, user_id).await?;
    if target.role == Role::Admin.as_str() {
        return Err(AppError::Forbidden(
            "The admin account cannot be deactivated".to_string(),
        ));
    }

    let updated = db::users::set_active(conn, user_id, !target.is_active).await?;
    info!(
        "User {} {} by user {}",
        user_id,
        if updated.is_active { "activated" } else { "deactivated" },
        actor.id
    );
    Ok(updated)
}
