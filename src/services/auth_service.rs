// services/auth_service.rs

use bcrypt::{hash, verify, DEFAULT_COST};
use deadpool_postgres::Pool;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        profile::Profile,
        user::{LoginData, RegisterData},
    },
    repositories::{auth_repository::AuthRepository, profile_repository::ProfileRepository},
    services::jwt_service::create_jwt,
    utils::password_validator::PasswordValidator,
};

/// Registers a new account: credentials in `users`, display data in
/// `profiles`, both in one transaction.
pub async fn register_user(pool: &Pool, payload: RegisterData) -> Result<Profile, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    PasswordValidator::default()
        .validate_with_details(&payload.password)
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let mut client = pool.get().await?;
    if AuthRepository::check_username_exists(&client, &payload.username).await? {
        return Err(AppError::Conflict("username"));
    }

    let hashed_password = hash(&payload.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {}", e)))?;

    let transaction = client.transaction().await?;
    let user_id = AuthRepository::create_user(&transaction, &payload, &hashed_password).await?;
    ProfileRepository::create(
        &transaction,
        user_id,
        &payload.username,
        payload.full_name.as_deref(),
    )
    .await?;
    transaction.commit().await?;

    info!("registered user {} ({})", payload.username, user_id);
    Ok(Profile {
        id: user_id,
        username: payload.username,
        full_name: payload.full_name,
        avatar_url: None,
    })
}

/// Verifies credentials and returns a fresh bearer token backed by a
/// session row.
pub async fn login_user(pool: &Pool, payload: LoginData) -> Result<String, AppError> {
    let client = pool.get().await?;

    let (user_id, stored_password) =
        AuthRepository::get_user_credentials(&client, &payload.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

    if !verify(&payload.password, &stored_password).unwrap_or(false) {
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(user_id)?;
    AuthRepository::create_session(&client, user_id, &token).await?;
    Ok(token)
}

/// Session/user lookup used by the socket route: resolves a token to the
/// authenticated user, or nothing.
pub async fn verify_session(pool: &Pool, token: &str) -> Result<Uuid, AppError> {
    let client = pool.get().await?;
    AuthRepository::verify_session_token(&client, token)
        .await?
        .ok_or(AppError::Unauthorized)
}

/// Profile of the authenticated user.
pub async fn current_profile(pool: &Pool, user_id: Uuid) -> Result<Profile, AppError> {
    let client = pool.get().await?;
    ProfileRepository::find_by_id(&client, user_id)
        .await?
        .ok_or(AppError::NotFound("user"))
}
