use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{message::Message, profile::Profile};

/// Events pushed to connected clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A message landed in a conversation the receiving user participates
    /// in. The sender profile is hydrated once at publish time.
    MessageCreated {
        message: Message,
        sender: Option<Profile>,
    },
}

/// Commands a client may send over the socket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientCommand {
    /// The client is viewing this conversation; live messages landing on it
    /// advance the read marker.
    Focus { conversation_id: Uuid },
    /// No conversation is open anymore.
    Blur,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_command_wire_shape() {
        let id = Uuid::new_v4();
        let raw = format!(r#"{{"type":"focus","conversation_id":"{}"}}"#, id);
        match serde_json::from_str::<ClientCommand>(&raw) {
            Ok(ClientCommand::Focus { conversation_id }) => assert_eq!(conversation_id, id),
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn blur_command_wire_shape() {
        let parsed: ClientCommand = serde_json::from_str(r#"{"type":"blur"}"#).unwrap();
        assert!(matches!(parsed, ClientCommand::Blur));
    }

    #[test]
    fn events_are_tagged_by_type() {
        let event = RealtimeEvent::MessageCreated {
            message: Message {
                id: Uuid::new_v4(),
                conversation_id: Uuid::new_v4(),
                sender_id: Uuid::new_v4(),
                content: "hello".to_string(),
                created_at: chrono::Utc::now(),
            },
            sender: None,
        };
        let raw = serde_json::to_value(&event).unwrap();
        assert_eq!(raw["type"], "message_created");
    }
}
