use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{message::Message, profile::Profile};

/// Canonical key for the unordered participant pair of a direct conversation.
/// Both orderings of the same pair produce the same key; a unique index over
/// this key is what guarantees one conversation per pair.
pub fn direct_pair_key(a: Uuid, b: Uuid) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{}:{}", lo, hi)
}

/// One row of the conversation list: the other participant, the newest
/// message (if any) and the caller's read marker.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSummary {
    pub id: Uuid,
    pub peer: Profile,
    pub last_message: Option<Message>,
    pub last_read_at: Option<DateTime<Utc>>,
    pub unread: bool,
}

impl ConversationSummary {
    /// A conversation is unread when its newest message postdates the read
    /// marker, or when messages exist but the marker was never set.
    pub fn is_unread(
        last_message_at: Option<DateTime<Utc>>,
        last_read_at: Option<DateTime<Utc>>,
    ) -> bool {
        match (last_message_at, last_read_at) {
            (Some(message_at), Some(read_at)) => message_at > read_at,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn last_message_at(&self) -> DateTime<Utc> {
        self.last_message
            .as_ref()
            .map(|m| m.created_at)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Newest-message-first ordering; conversations without messages sort
    /// last (their timestamp collapses to the epoch floor).
    pub fn by_newest_message_desc(a: &ConversationSummary, b: &ConversationSummary) -> Ordering {
        b.last_message_at().cmp(&a.last_message_at())
    }
}

#[derive(Debug, Deserialize)]
pub struct StartConversationRequest {
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn summary(last_message_at: Option<DateTime<Utc>>) -> ConversationSummary {
        let id = Uuid::new_v4();
        ConversationSummary {
            id,
            peer: Profile {
                id: Uuid::new_v4(),
                username: "peer".to_string(),
                full_name: None,
                avatar_url: None,
            },
            last_message: last_message_at.map(|created_at| Message {
                id: Uuid::new_v4(),
                conversation_id: id,
                sender_id: Uuid::new_v4(),
                content: "hey".to_string(),
                created_at,
            }),
            last_read_at: None,
            unread: false,
        }
    }

    #[test]
    fn pair_key_ignores_argument_order() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(direct_pair_key(a, b), direct_pair_key(b, a));
    }

    #[test]
    fn pair_keys_differ_across_pairs() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert_ne!(direct_pair_key(a, b), direct_pair_key(a, c));
    }

    #[test]
    fn unread_when_message_postdates_marker() {
        assert!(ConversationSummary::is_unread(Some(at(100)), Some(at(50))));
        assert!(!ConversationSummary::is_unread(Some(at(50)), Some(at(100))));
        assert!(!ConversationSummary::is_unread(Some(at(50)), Some(at(50))));
    }

    #[test]
    fn unread_when_marker_absent() {
        assert!(ConversationSummary::is_unread(Some(at(1)), None));
    }

    #[test]
    fn never_unread_without_messages() {
        assert!(!ConversationSummary::is_unread(None, None));
        assert!(!ConversationSummary::is_unread(None, Some(at(1))));
    }

    #[test]
    fn sorts_newest_first_with_empty_conversations_last() {
        let mut list = vec![
            summary(None),
            summary(Some(at(200))),
            summary(Some(at(300))),
            summary(Some(at(100))),
        ];
        list.sort_by(ConversationSummary::by_newest_message_desc);

        let times: Vec<Option<DateTime<Utc>>> = list
            .iter()
            .map(|s| s.last_message.as_ref().map(|m| m.created_at))
            .collect();
        assert_eq!(
            times,
            vec![Some(at(300)), Some(at(200)), Some(at(100)), None]
        );
    }
}
