//! # GraphQL Subscription Resolver
//!
//! Real-time event subscriptions of the Star Wars schema segment.

use async_graphql::{Context, Result, Subscription};
use futures_util::Stream;
use tokio::sync::broadcast::error::RecvError;

use crate::context::ApiContext;
use crate::events::{EventMessage, EventTopic};
use crate::schema::*;

/// Subscriptions contributed by the Star Wars schema
#[derive(Default)]
pub struct StarWarsSubscription;

#[Subscription]
impl StarWarsSubscription {
    /// Subscribe to new reviews of an episode
    async fn on_review(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Episode to receive reviews for")]
        episode: Episode,
    ) -> Result<impl Stream<Item = Review>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let topic = EventTopic::OnReview(episode.into());
        let mut rx = api_ctx.event_registry.subscribe(topic).await;

        tracing::debug!(?topic, "Subscription opened");

        Ok(async_stream::stream! {
            loop {
                match rx.recv().await {
                    Ok(EventMessage::ReviewCreated(review)) => yield Review::from(review),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(?topic, skipped, "Subscriber lagged, skipping reviews");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }
}
