// repositories/conversation_repository.rs

use chrono::{DateTime, Utc};
use deadpool_postgres::{Client, Transaction};
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::{
    conversation::ConversationSummary,
    message::Message,
    profile::Profile,
};

pub struct ConversationRepository;

impl ConversationRepository {
    /// Looks up the direct conversation for a canonical pair key
    pub async fn find_direct_by_key(
        client: &Client,
        direct_key: &str,
    ) -> Result<Option<Uuid>, tokio_postgres::Error> {
        let query = "SELECT id FROM conversations WHERE direct_key = $1 AND NOT is_group";
        let row = client.query_opt(query, &[&direct_key]).await?;
        Ok(row.map(|row| row.get(0)))
    }

    /// Inserts a direct conversation guarded by the pair-key unique index.
    /// Returns `None` when a concurrent caller already created the row for
    /// this pair; the caller then re-reads the winner.
    pub async fn insert_direct(
        transaction: &Transaction<'_>,
        conversation_id: Uuid,
        direct_key: &str,
    ) -> Result<Option<Uuid>, tokio_postgres::Error> {
        let query = "
            INSERT INTO conversations (id, is_group, direct_key)
            VALUES ($1, FALSE, $2)
            ON CONFLICT (direct_key) WHERE NOT is_group DO NOTHING
            RETURNING id
        ";
        let row = transaction
            .query_opt(query, &[&conversation_id, &direct_key])
            .await?;
        Ok(row.map(|row| row.get(0)))
    }

    /// Adds a participant row, idempotently
    pub async fn add_participant(
        transaction: &Transaction<'_>,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), tokio_postgres::Error> {
        let query = "
            INSERT INTO conversation_participants (conversation_id, user_id)
            VALUES ($1, $2)
            ON CONFLICT (conversation_id, user_id) DO NOTHING
        ";
        transaction
            .execute(query, &[&conversation_id, &user_id])
            .await?;
        Ok(())
    }

    /// Checks if a user participates in a conversation
    pub async fn is_participant(
        client: &Client,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, tokio_postgres::Error> {
        let query = "
            SELECT 1 FROM conversation_participants WHERE conversation_id = $1 AND user_id = $2
        ";
        let result = client.query_opt(query, &[&conversation_id, &user_id]).await?;
        Ok(result.is_some())
    }

    /// All participant ids of a conversation, used to route realtime events
    pub async fn participant_ids(
        client: &Client,
        conversation_id: Uuid,
    ) -> Result<Vec<Uuid>, tokio_postgres::Error> {
        let query = "SELECT user_id FROM conversation_participants WHERE conversation_id = $1";
        let rows = client.query(query, &[&conversation_id]).await?;
        Ok(rows.iter().map(|row| row.get(0)).collect())
    }

    /// Advances the read marker for (conversation, user) to the current time
    pub async fn touch_last_read(
        client: &Client,
        conversation_id: Uuid,
        user_id: Uuid,
    ) -> Result<(), tokio_postgres::Error> {
        let query = "
            UPDATE conversation_participants
            SET last_read_at = NOW()
            WHERE conversation_id = $1 AND user_id = $2
        ";
        client.execute(query, &[&conversation_id, &user_id]).await?;
        Ok(())
    }

    /// One row per direct conversation of `user_id`: the other participant's
    /// profile, the newest message if any, and the caller's read marker. The
    /// lateral join keeps the whole list to a single round trip.
    pub async fn summaries_for_user(
        client: &Client,
        user_id: Uuid,
    ) -> Result<Vec<ConversationSummary>, tokio_postgres::Error> {
        let query = "
            SELECT cp.conversation_id,
                   cp.last_read_at,
                   pr.id, pr.username, pr.full_name, pr.avatar_url,
                   lm.id, lm.content, lm.sender_id, lm.created_at
            FROM conversation_participants cp
            JOIN conversations c
              ON c.id = cp.conversation_id AND NOT c.is_group
            JOIN conversation_participants op
              ON op.conversation_id = cp.conversation_id AND op.user_id <> cp.user_id
            JOIN profiles pr ON pr.id = op.user_id
            LEFT JOIN LATERAL (
                SELECT m.id, m.content, m.sender_id, m.created_at
                FROM messages m
                WHERE m.conversation_id = cp.conversation_id
                ORDER BY m.created_at DESC, m.id DESC
                LIMIT 1
            ) lm ON TRUE
            WHERE cp.user_id = $1
        ";
        let rows = client.query(query, &[&user_id]).await?;
        Ok(rows.iter().map(summary_from_row).collect())
    }
}

fn summary_from_row(row: &Row) -> ConversationSummary {
    let conversation_id: Uuid = row.get(0);
    let last_read_at: Option<DateTime<Utc>> = row.get(1);
    let peer = Profile {
        id: row.get(2),
        username: row.get(3),
        full_name: row.get(4),
        avatar_url: row.get(5),
    };
    let last_message = row
        .get::<_, Option<Uuid>>(6)
        .map(|message_id| Message {
            id: message_id,
            conversation_id,
            sender_id: row.get(8),
            content: row.get(7),
            created_at: row.get(9),
        });
    let unread = ConversationSummary::is_unread(
        last_message.as_ref().map(|m| m.created_at),
        last_read_at,
    );

    ConversationSummary {
        id: conversation_id,
        peer,
        last_message,
        last_read_at,
        unread,
    }
}
