use axum::{extract::Path, Extension, Json};

use crate::{
    app_state::AppState,
    error::AppError,
    models::profile::Profile,
    repositories::profile_repository::ProfileRepository,
};

/// Looks a user up by username (case-insensitive), as typed into the
/// new-message flow
pub async fn find_profile(
    Extension(state): Extension<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Profile>, AppError> {
    let client = state.db.get().await?;
    let profile = ProfileRepository::find_by_username(&client, &username)
        .await?
        .ok_or(AppError::NotFound("user"))?;
    Ok(Json(profile))
}
