//! # API Context
//!
//! Application state and dependency injection for GraphQL resolvers.

use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::events::{EventRegistry, EventSender, InMemoryEventRegistry, DEFAULT_CHANNEL_CAPACITY};
use starwars_persistence::{
    CharacterRepository, InMemoryCharacterRepository, InMemoryReviewRepository, ReviewRepository,
};

/// Application context shared across all GraphQL resolvers
#[derive(Clone)]
pub struct ApiContext {
    /// Character and starship repository
    pub characters: Arc<dyn CharacterRepository>,

    /// Review repository
    pub reviews: Arc<dyn ReviewRepository>,

    /// Publishing side of the event registry
    pub event_sender: Arc<dyn EventSender>,

    /// Subscribing side of the event registry
    pub event_registry: Arc<dyn EventRegistry>,
}

impl ApiContext {
    /// Create a context from explicit dependencies
    pub fn new(
        characters: Arc<dyn CharacterRepository>,
        reviews: Arc<dyn ReviewRepository>,
        events: Arc<InMemoryEventRegistry>,
    ) -> Self {
        Self {
            characters,
            reviews,
            event_sender: events.clone(),
            event_registry: events,
        }
    }

    /// Create a context backed by the in-memory repositories
    ///
    /// # Errors
    ///
    /// Returns an error if the character seed cannot be loaded.
    pub fn in_memory(event_channel_capacity: usize) -> ApiResult<Self> {
        ApiContextBuilder::new()
            .with_event_capacity(event_channel_capacity)
            .build()
    }
}

/// Builder for ApiContext
pub struct ApiContextBuilder {
    characters: Option<Arc<dyn CharacterRepository>>,
    reviews: Option<Arc<dyn ReviewRepository>>,
    events: Option<Arc<InMemoryEventRegistry>>,
    event_capacity: usize,
}

impl ApiContextBuilder {
    pub fn new() -> Self {
        Self {
            characters: None,
            reviews: None,
            events: None,
            event_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn with_characters(mut self, characters: Arc<dyn CharacterRepository>) -> Self {
        self.characters = Some(characters);
        self
    }

    pub fn with_reviews(mut self, reviews: Arc<dyn ReviewRepository>) -> Self {
        self.reviews = Some(reviews);
        self
    }

    pub fn with_events(mut self, events: Arc<InMemoryEventRegistry>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the context, filling unset dependencies with in-memory defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the default character seed cannot be loaded.
    pub fn build(self) -> ApiResult<ApiContext> {
        let characters = match self.characters {
            Some(repo) => repo,
            None => Arc::new(
                InMemoryCharacterRepository::from_seed().map_err(ApiError::from)?,
            ),
        };

        let reviews = self
            .reviews
            .unwrap_or_else(|| Arc::new(InMemoryReviewRepository::new()));

        let events = self
            .events
            .unwrap_or_else(|| Arc::new(InMemoryEventRegistry::new(self.event_capacity)));

        Ok(ApiContext::new(characters, reviews, events))
    }
}

impl Default for ApiContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starwars_domain::Episode;

    #[tokio::test]
    async fn test_in_memory_context() {
        let ctx = ApiContext::in_memory(16).unwrap();
        let hero = ctx.characters.get_hero(Episode::NewHope).await.unwrap();
        assert_eq!(hero.name(), "R2-D2");
        assert_eq!(ctx.reviews.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_builder_shares_one_registry() {
        let events = Arc::new(InMemoryEventRegistry::new(4));
        let ctx = ApiContextBuilder::new()
            .with_events(events.clone())
            .build()
            .unwrap();

        let topic = crate::events::EventTopic::OnReview(Episode::Jedi);
        let _rx = ctx.event_registry.subscribe(topic).await;
        assert_eq!(events.subscriber_count(topic).await, 1);
    }
}
