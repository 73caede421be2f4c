//! # GraphQL Mutation Resolver
//!
//! Write operations of the Star Wars schema segment.

use async_graphql::{Context, Object, Result};

use crate::auth::{PolicyGuard, HAS_COUNTRY};
use crate::context::ApiContext;
use crate::error::graphql_error;
use crate::events::EventMessage;
use crate::schema::*;
use starwars_domain as domain;

/// Mutations contributed by the Star Wars schema
#[derive(Default)]
pub struct StarWarsMutation;

#[Object]
impl StarWarsMutation {
    /// Add a review to an episode and notify `onReview` subscribers
    #[graphql(guard = "PolicyGuard::new(HAS_COUNTRY)")]
    async fn create_review(
        &self,
        ctx: &Context<'_>,
        episode: Episode,
        review: ReviewInput,
    ) -> Result<Review> {
        let api_ctx = ctx.data::<ApiContext>()?;

        let review = domain::Review::new(episode.into(), review.stars, review.commentary)
            .map_err(graphql_error)?;
        let stored = api_ctx
            .reviews
            .add_review(review)
            .await
            .map_err(graphql_error)?;

        let delivered = api_ctx
            .event_sender
            .send(EventMessage::ReviewCreated(stored.clone()))
            .await;

        tracing::info!(
            review_id = %stored.id,
            episode = stored.episode.as_str(),
            stars = stored.stars,
            delivered,
            "Review created"
        );

        Ok(stored.into())
    }
}
