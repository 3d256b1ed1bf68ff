use axum::{response::IntoResponse, Extension, Json};
use hyper::StatusCode;
use serde_json::json;

use crate::{
    app_state::AppState,
    error::AppError,
    middleware::auth_middleware::CurrentUser,
    models::{
        profile::Profile,
        user::{LoginData, RegisterData},
    },
    services::auth_service,
};

/// Handler for user registration
pub async fn register(
    Extension(state): Extension<AppState>,
    Json(payload): Json<RegisterData>,
) -> Result<impl IntoResponse, AppError> {
    let profile = auth_service::register_user(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "user": profile }))))
}

/// Handler for user login
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LoginData>,
) -> Result<impl IntoResponse, AppError> {
    let token = auth_service::login_user(&state.db, payload).await?;
    Ok(Json(json!({ "token": token, "type": "Bearer" })))
}

/// Session/user lookup for the authenticated caller
pub async fn me(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Profile>, AppError> {
    let profile = auth_service::current_profile(&state.db, user.0).await?;
    Ok(Json(profile))
}
