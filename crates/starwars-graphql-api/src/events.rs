//! # Event Registry
//!
//! In-memory publish/subscribe backing GraphQL subscriptions. Each topic
//! owns a broadcast channel that is created on first subscription.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::{broadcast, RwLock};

use starwars_domain::{Episode, Review};

/// Default broadcast channel capacity per topic
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Subscription topics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTopic {
    OnReview(Episode),
}

/// Messages delivered to subscribers
#[derive(Debug, Clone)]
pub enum EventMessage {
    ReviewCreated(Review),
}

impl EventMessage {
    /// Topic this message is published on
    pub fn topic(&self) -> EventTopic {
        match self {
            Self::ReviewCreated(review) => EventTopic::OnReview(review.episode),
        }
    }
}

/// Publishing side of the registry
#[async_trait]
pub trait EventSender: Send + Sync {
    /// Publish a message; returns the number of subscribers that received it
    async fn send(&self, message: EventMessage) -> usize;
}

/// Subscribing side of the registry
#[async_trait]
pub trait EventRegistry: Send + Sync {
    async fn subscribe(&self, topic: EventTopic) -> broadcast::Receiver<EventMessage>;
}

/// Broadcast-channel registry held in process memory
#[derive(Debug)]
pub struct InMemoryEventRegistry {
    capacity: usize,
    topics: RwLock<HashMap<EventTopic, broadcast::Sender<EventMessage>>>,
}

impl InMemoryEventRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live subscribers on a topic
    pub async fn subscriber_count(&self, topic: EventTopic) -> usize {
        self.topics
            .read()
            .await
            .get(&topic)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl Default for InMemoryEventRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

#[async_trait]
impl EventSender for InMemoryEventRegistry {
    async fn send(&self, message: EventMessage) -> usize {
        let topic = message.topic();
        let topics = self.topics.read().await;

        let Some(tx) = topics.get(&topic) else {
            tracing::trace!(?topic, "No subscribers for topic");
            return 0;
        };

        // A send error only means every receiver has gone away
        let delivered = tx.send(message).unwrap_or(0);
        tracing::debug!(?topic, delivered, "Event published");
        delivered
    }
}

#[async_trait]
impl EventRegistry for InMemoryEventRegistry {
    async fn subscribe(&self, topic: EventTopic) -> broadcast::Receiver<EventMessage> {
        if let Some(tx) = self.topics.read().await.get(&topic) {
            return tx.subscribe();
        }

        let mut topics = self.topics.write().await;
        let rx = topics
            .entry(topic)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        tracing::debug!(?topic, "Subscriber registered");
        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(episode: Episode, stars: i32) -> Review {
        Review::new(episode, stars, None).unwrap()
    }

    #[tokio::test]
    async fn test_send_without_subscribers() {
        let registry = InMemoryEventRegistry::default();
        let delivered = registry
            .send(EventMessage::ReviewCreated(review(Episode::Jedi, 4)))
            .await;
        assert_eq!(delivered, 0);
    }

    #[tokio::test]
    async fn test_messages_routed_by_topic() {
        let registry = InMemoryEventRegistry::new(8);
        let mut empire = registry.subscribe(EventTopic::OnReview(Episode::Empire)).await;
        let mut jedi = registry.subscribe(EventTopic::OnReview(Episode::Jedi)).await;

        let sent = review(Episode::Empire, 5);
        let delivered = registry.send(EventMessage::ReviewCreated(sent.clone())).await;
        assert_eq!(delivered, 1);

        let EventMessage::ReviewCreated(received) = empire.recv().await.unwrap();
        assert_eq!(received.id, sent.id);
        assert!(jedi.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_subscriber_count_tracks_receivers() {
        let registry = InMemoryEventRegistry::default();
        let topic = EventTopic::OnReview(Episode::NewHope);
        assert_eq!(registry.subscriber_count(topic).await, 0);

        let first = registry.subscribe(topic).await;
        let _second = registry.subscribe(topic).await;
        assert_eq!(registry.subscriber_count(topic).await, 2);

        drop(first);
        assert_eq!(registry.subscriber_count(topic).await, 1);
    }

    #[tokio::test]
    async fn test_lagging_receiver_reports_lag() {
        let registry = InMemoryEventRegistry::new(1);
        let mut rx = registry.subscribe(EventTopic::OnReview(Episode::Jedi)).await;

        for stars in [1, 2] {
            registry
                .send(EventMessage::ReviewCreated(review(Episode::Jedi, stars)))
                .await;
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        let EventMessage::ReviewCreated(latest) = rx.recv().await.unwrap();
        assert_eq!(latest.stars, 2);
    }
}
