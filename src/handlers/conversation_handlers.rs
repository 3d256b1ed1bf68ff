use axum::{extract::Path, response::IntoResponse, Extension, Json};
use hyper::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::AppError,
    middleware::auth_middleware::CurrentUser,
    models::{conversation::StartConversationRequest, message::SendMessageRequest},
    services::{conversation_service, message_service},
};

/// Conversation list for the authenticated user, newest activity first
pub async fn list_conversations(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, AppError> {
    let summaries = conversation_service::fetch_conversations(&state.db, user.0).await?;
    Ok(Json(summaries))
}

/// Finds or creates the conversation with the named peer
pub async fn start_conversation(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<StartConversationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (conversation_id, peer) =
        conversation_service::start_conversation_with_username(&state.db, user.0, &payload.username)
            .await?;
    Ok(Json(json!({ "conversation_id": conversation_id, "peer": peer })))
}

/// Opens a thread: marks it read and returns the ordered, hydrated history
pub async fn get_thread(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(conversation_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let thread = conversation_service::open_conversation(&state.db, user.0, conversation_id).await?;
    Ok(Json(thread))
}

/// Stores a message in the conversation and fans it out to participants
pub async fn send_message(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(conversation_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, AppError> {
    let message = message_service::send_message(
        &state.db,
        &state.connections,
        user.0,
        conversation_id,
        &payload.content,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(message)))
}
