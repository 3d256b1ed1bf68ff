use std::collections::HashMap;

use deadpool_postgres::Pool;
use tracing::info;
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{
        conversation::{direct_pair_key, ConversationSummary},
        message::ThreadMessage,
        profile::Profile,
    },
    repositories::{
        conversation_repository::ConversationRepository,
        message_repository::MessageRepository,
        profile_repository::ProfileRepository,
    },
};

/// Finds the direct conversation between `me` and `other`, creating it on
/// first contact. Repeated and concurrent calls for the same pair resolve to
/// the same conversation: creation is guarded by the pair-key unique index,
/// and a lost insert race falls back to the winner's row.
pub async fn ensure_conversation_with(
    pool: &Pool,
    me: Uuid,
    other: Uuid,
) -> Result<Uuid, AppError> {
    if me == other {
        return Err(AppError::Validation(
            "cannot start a conversation with yourself".to_string(),
        ));
    }

    let mut client = pool.get().await?;
    let pair_key = direct_pair_key(me, other);

    if let Some(existing) = ConversationRepository::find_direct_by_key(&client, &pair_key).await? {
        return Ok(existing);
    }

    let transaction = client.transaction().await?;
    match ConversationRepository::insert_direct(&transaction, Uuid::new_v4(), &pair_key).await? {
        Some(conversation_id) => {
            ConversationRepository::add_participant(&transaction, conversation_id, me).await?;
            ConversationRepository::add_participant(&transaction, conversation_id, other).await?;
            transaction.commit().await?;
            info!("created conversation {} for pair {}", conversation_id, pair_key);
            Ok(conversation_id)
        }
        None => {
            // A concurrent caller won the insert; their row is committed by
            // the time ON CONFLICT resolves.
            transaction.rollback().await?;
            ConversationRepository::find_direct_by_key(&client, &pair_key)
                .await?
                .ok_or(AppError::NotFound("conversation"))
        }
    }
}

/// Resolves a peer by username and ensures the conversation with them.
/// Returns the conversation id together with the peer's profile.
pub async fn start_conversation_with_username(
    pool: &Pool,
    me: Uuid,
    username: &str,
) -> Result<(Uuid, Profile), AppError> {
    let target = {
        let client = pool.get().await?;
        ProfileRepository::find_by_username(&client, username)
            .await?
            .ok_or(AppError::NotFound("user"))?
    };
    let conversation_id = ensure_conversation_with(pool, me, target.id).await?;
    Ok((conversation_id, target))
}

/// Opens a conversation for `me`: advances the read marker, then returns the
/// full history oldest-first with sender profiles hydrated in one batch
/// query over the distinct sender set.
pub async fn open_conversation(
    pool: &Pool,
    me: Uuid,
    conversation_id: Uuid,
) -> Result<Vec<ThreadMessage>, AppError> {
    let client = pool.get().await?;
    if !ConversationRepository::is_participant(&client, conversation_id, me).await? {
        return Err(AppError::NotFound("conversation"));
    }

    ConversationRepository::touch_last_read(&client, conversation_id, me).await?;
    let history = MessageRepository::history(&client, conversation_id).await?;

    let mut sender_ids: Vec<Uuid> = history.iter().map(|m| m.sender_id).collect();
    sender_ids.sort_unstable();
    sender_ids.dedup();
    let profiles = ProfileRepository::find_by_ids(&client, &sender_ids).await?;
    let profiles_by_id: HashMap<Uuid, Profile> =
        profiles.into_iter().map(|p| (p.id, p)).collect();

    Ok(history
        .into_iter()
        .map(|message| ThreadMessage {
            mine: message.sender_id == me,
            sender: profiles_by_id.get(&message.sender_id).cloned(),
            message,
        })
        .collect())
}

/// Builds the conversation list for `me`, newest activity first;
/// conversations that never saw a message sort last.
pub async fn fetch_conversations(
    pool: &Pool,
    me: Uuid,
) -> Result<Vec<ConversationSummary>, AppError> {
    let client = pool.get().await?;
    let mut summaries = ConversationRepository::summaries_for_user(&client, me).await?;
    summaries.sort_by(ConversationSummary::by_newest_message_desc);
    Ok(summaries)
}
