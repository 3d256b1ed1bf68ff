// repositories/message_repository.rs

use deadpool_postgres::Client;
use tokio_postgres::Row;
use uuid::Uuid;

use crate::models::message::Message;

pub struct MessageRepository;

fn message_from_row(row: &Row) -> Message {
    Message {
        id: row.get(0),
        conversation_id: row.get(1),
        sender_id: row.get(2),
        content: row.get(3),
        created_at: row.get(4),
    }
}

impl MessageRepository {
    /// Full history of a conversation, oldest first. The id tiebreaker keeps
    /// the order stable for messages created in the same instant.
    pub async fn history(
        client: &Client,
        conversation_id: Uuid,
    ) -> Result<Vec<Message>, tokio_postgres::Error> {
        let query = "
            SELECT id, conversation_id, sender_id, content, created_at
            FROM messages
            WHERE conversation_id = $1
            ORDER BY created_at ASC, id ASC
        ";
        let rows = client.query(query, &[&conversation_id]).await?;
        Ok(rows.iter().map(message_from_row).collect())
    }

    /// Inserts a new message and returns the stored row
    pub async fn insert(
        client: &Client,
        conversation_id: Uuid,
        sender_id: Uuid,
        content: &str,
    ) -> Result<Message, tokio_postgres::Error> {
        let message_id = Uuid::new_v4();
        let query = "
            INSERT INTO messages (id, conversation_id, sender_id, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id, conversation_id, sender_id, content, created_at
        ";
        let row = client
            .query_one(query, &[&message_id, &conversation_id, &sender_id, &content])
            .await?;
        Ok(message_from_row(&row))
    }
}
