use deadpool_postgres::Pool;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::message::Message,
    repositories::{
        conversation_repository::ConversationRepository,
        message_repository::MessageRepository,
        profile_repository::ProfileRepository,
    },
    websocket::{connection_manager::ConnectionManager, types::RealtimeEvent},
};

/// Stores a message from `sender` in `conversation_id`, advances the
/// sender's read marker, and publishes the insert to every participant's
/// realtime subscription.
pub async fn send_message(
    pool: &Pool,
    connections: &ConnectionManager,
    sender: Uuid,
    conversation_id: Uuid,
    content: &str,
) -> Result<Message, AppError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(AppError::Validation(
            "message content must not be empty".to_string(),
        ));
    }

    let client = pool.get().await?;
    if !ConversationRepository::is_participant(&client, conversation_id, sender).await? {
        return Err(AppError::NotFound("conversation"));
    }

    let message = MessageRepository::insert(&client, conversation_id, sender, content).await?;
    // The sender has obviously seen their own message
    ConversationRepository::touch_last_read(&client, conversation_id, sender).await?;

    let sender_profile = ProfileRepository::find_by_id(&client, sender).await?;
    let recipients = ConversationRepository::participant_ids(&client, conversation_id).await?;
    connections.publish(
        &recipients,
        &RealtimeEvent::MessageCreated {
            message: message.clone(),
            sender: sender_profile,
        },
    );

    Ok(message)
}
