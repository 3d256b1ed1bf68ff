// src/websocket/connection_manager.rs

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};

use tokio::sync::broadcast;
use uuid::Uuid;

use super::types::RealtimeEvent;

const CHANNEL_CAPACITY: usize = 100;

/// Registry of per-user realtime channels. Each connected socket holds a
/// [`Subscription`] obtained from here; publishing fans an event out to every
/// live session of the listed users. Users with no live session simply miss
/// the event (they will see the message through a history load).
#[derive(Clone)]
pub struct ConnectionManager {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<RealtimeEvent>>>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, broadcast::Sender<RealtimeEvent>>> {
        // Recover the map on poison; publishing never leaves it mid-update
        self.channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a session for `user_id` and returns its event stream.
    /// Several sessions of the same user share one channel.
    pub fn subscribe(&self, user_id: Uuid) -> Subscription {
        let mut channels = self.write();
        let sender = channels
            .entry(user_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0);
        Subscription {
            receiver: sender.subscribe(),
        }
    }

    /// Sends an event to every recipient with at least one live session.
    /// Channels whose last subscription was dropped are pruned on the way.
    pub fn publish(&self, recipients: &[Uuid], event: &RealtimeEvent) {
        let mut channels = self.write();
        for user_id in recipients {
            if let Some(sender) = channels.get(user_id) {
                if sender.receiver_count() == 0 {
                    channels.remove(user_id);
                    continue;
                }
                let _ = sender.send(event.clone());
            }
        }
    }

    #[cfg(test)]
    fn channel_count(&self) -> usize {
        self.write().len()
    }
}

/// A live event stream for one socket session. Dropping the handle cancels
/// delivery; nothing else has to be cleaned up.
pub struct Subscription {
    receiver: broadcast::Receiver<RealtimeEvent>,
}

impl Subscription {
    /// Next event, or `None` once the stream is closed. A session that falls
    /// behind loses the overwritten events and keeps receiving.
    pub async fn recv(&mut self) -> Option<RealtimeEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("realtime subscription lagged, dropped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::message::Message;
    use std::time::Duration;
    use tokio::time::timeout;

    fn message_event(conversation_id: Uuid, sender_id: Uuid) -> RealtimeEvent {
        RealtimeEvent::MessageCreated {
            message: Message {
                id: Uuid::new_v4(),
                conversation_id,
                sender_id,
                content: "ping".to_string(),
                created_at: chrono::Utc::now(),
            },
            sender: None,
        }
    }

    async fn recv_soon(subscription: &mut Subscription) -> Option<RealtimeEvent> {
        timeout(Duration::from_millis(100), subscription.recv())
            .await
            .expect("expected an event before the timeout")
    }

    #[tokio::test]
    async fn delivers_to_every_recipient() {
        let manager = ConnectionManager::new();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let mut alice_sub = manager.subscribe(alice);
        let mut bob_sub = manager.subscribe(bob);

        let event = message_event(Uuid::new_v4(), alice);
        manager.publish(&[alice, bob], &event);

        assert!(recv_soon(&mut alice_sub).await.is_some());
        assert!(recv_soon(&mut bob_sub).await.is_some());
    }

    #[tokio::test]
    async fn non_recipients_hear_nothing() {
        let manager = ConnectionManager::new();
        let alice = Uuid::new_v4();
        let eve = Uuid::new_v4();
        let _alice_sub = manager.subscribe(alice);
        let mut eve_sub = manager.subscribe(eve);

        manager.publish(&[alice], &message_event(Uuid::new_v4(), alice));

        let silent = timeout(Duration::from_millis(100), eve_sub.recv()).await;
        assert!(silent.is_err(), "event leaked to a non-participant");
    }

    #[tokio::test]
    async fn same_user_sessions_share_events() {
        let manager = ConnectionManager::new();
        let alice = Uuid::new_v4();
        let mut first = manager.subscribe(alice);
        let mut second = manager.subscribe(alice);

        manager.publish(&[alice], &message_event(Uuid::new_v4(), alice));

        assert!(recv_soon(&mut first).await.is_some());
        assert!(recv_soon(&mut second).await.is_some());
    }

    #[tokio::test]
    async fn dropped_subscriptions_are_pruned_on_publish() {
        let manager = ConnectionManager::new();
        let alice = Uuid::new_v4();
        let subscription = manager.subscribe(alice);
        assert_eq!(manager.channel_count(), 1);

        drop(subscription);
        manager.publish(&[alice], &message_event(Uuid::new_v4(), alice));
        assert_eq!(manager.channel_count(), 0);
    }
}
