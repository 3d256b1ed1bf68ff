use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket},
        WebSocketUpgrade,
    },
    response::IntoResponse,
    Extension,
};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::AppError,
    middleware::auth_middleware::CurrentUser,
    repositories::conversation_repository::ConversationRepository,
    websocket::types::{ClientCommand, RealtimeEvent},
};

/// Per-connection state, created on upgrade and dropped on disconnect. The
/// focused conversation decides whether a live message advances the user's
/// read marker.
struct WsSession {
    user_id: Uuid,
    focused_conversation: Option<Uuid>,
}

// Handles the WebSocket upgrade; the token was already verified by the
// ws_auth middleware.
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_websocket_connection(socket, state, user.0))
}

async fn handle_websocket_connection(mut socket: WebSocket, state: AppState, user_id: Uuid) {
    let mut subscription = state.connections.subscribe(user_id);
    let mut session = WsSession {
        user_id,
        focused_conversation: None,
    };
    log::info!("realtime session opened for user {}", user_id);

    // Dispatch loop: client commands on one side, subscribed events on the
    // other. Either stream ending closes the session.
    loop {
        tokio::select! {
            incoming = socket.recv() => {
                match incoming {
                    Some(Ok(WsMessage::Text(text))) => {
                        if let Err(e) = handle_client_command(&state, &mut session, &text).await {
                            log::warn!("command from user {} rejected: {}", user_id, e);
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        log::warn!("websocket error for user {}: {}", user_id, e);
                        break;
                    }
                }
            }
            event = subscription.recv() => {
                match event {
                    Some(event) => {
                        if deliver_event(&state, &session, &mut socket, event).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }

    log::info!("realtime session closed for user {}", user_id);
}

async fn handle_client_command(
    state: &AppState,
    session: &mut WsSession,
    raw: &str,
) -> Result<(), AppError> {
    let command: ClientCommand = serde_json::from_str(raw)
        .map_err(|e| AppError::Validation(format!("malformed command: {}", e)))?;

    match command {
        ClientCommand::Focus { conversation_id } => {
            let client = state.db.get().await?;
            if !ConversationRepository::is_participant(&client, conversation_id, session.user_id)
                .await?
            {
                return Err(AppError::NotFound("conversation"));
            }
            ConversationRepository::touch_last_read(&client, conversation_id, session.user_id)
                .await?;
            session.focused_conversation = Some(conversation_id);
        }
        ClientCommand::Blur => {
            session.focused_conversation = None;
        }
    }
    Ok(())
}

/// Forwards one event to the client. A message landing on the focused
/// conversation also advances the read marker, so a list rebuild right after
/// does not flag it unread.
async fn deliver_event(
    state: &AppState,
    session: &WsSession,
    socket: &mut WebSocket,
    event: RealtimeEvent,
) -> Result<(), ()> {
    let RealtimeEvent::MessageCreated { ref message, .. } = event;
    if session.focused_conversation == Some(message.conversation_id) {
        if let Err(e) = mark_focused_read(state, session, message.conversation_id).await {
            // The event is still delivered; only the marker update failed
            log::warn!(
                "failed to advance read marker for user {}: {}",
                session.user_id,
                e
            );
        }
    }

    let payload = match serde_json::to_string(&event) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("failed to serialize realtime event: {}", e);
            return Ok(());
        }
    };

    socket.send(WsMessage::Text(payload)).await.map_err(|e| {
        log::warn!("failed to push event to user {}: {}", session.user_id, e);
    })
}

async fn mark_focused_read(
    state: &AppState,
    session: &WsSession,
    conversation_id: Uuid,
) -> Result<(), AppError> {
    let client = state.db.get().await?;
    ConversationRepository::touch_last_read(&client, conversation_id, session.user_id).await?;
    Ok(())
}
