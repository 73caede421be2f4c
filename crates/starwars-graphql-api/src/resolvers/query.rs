//! # GraphQL Query Resolver
//!
//! Read operations of the Star Wars schema segment.

use async_graphql::{Context, Object, Result, ID};

use crate::context::ApiContext;
use crate::error::graphql_error;
use crate::schema::*;

/// Queries contributed by the Star Wars schema
#[derive(Default)]
pub struct StarWarsQuery;

#[Object]
impl StarWarsQuery {
    // =========================================================================
    // CHARACTER QUERIES
    // =========================================================================

    /// The hero of an episode
    ///
    /// Luke for The Empire Strikes Back, R2-D2 for every other episode.
    async fn hero(
        &self,
        ctx: &Context<'_>,
        #[graphql(
            desc = "If omitted, returns the hero of the whole saga",
            default_with = "Episode::NewHope"
        )]
        episode: Episode,
    ) -> Result<Character> {
        let api_ctx = ctx.data::<ApiContext>()?;

        tracing::debug!(episode = ?episode, "Fetching hero");

        let hero = api_ctx
            .characters
            .get_hero(episode.into())
            .await
            .map_err(graphql_error)?;

        Ok(hero.into())
    }

    /// Characters by ID; unknown IDs are skipped
    async fn character(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Character IDs")]
        ids: Vec<ID>,
    ) -> Result<Vec<Character>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let ids: Vec<String> = ids.into_iter().map(|id| id.0).collect();

        let characters = api_ctx
            .characters
            .get_characters(&ids)
            .await
            .map_err(graphql_error)?;

        Ok(characters.into_iter().map(Character::from).collect())
    }

    /// Get a human by ID
    async fn human(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Human>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let human = api_ctx
            .characters
            .get_human(&id)
            .await
            .map_err(graphql_error)?;
        Ok(human.map(Human))
    }

    /// Get a droid by ID
    async fn droid(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Droid>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let droid = api_ctx
            .characters
            .get_droid(&id)
            .await
            .map_err(graphql_error)?;
        Ok(droid.map(Droid))
    }

    /// Get a starship by ID
    async fn starship(&self, ctx: &Context<'_>, id: ID) -> Result<Option<Starship>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let starship = api_ctx
            .characters
            .get_starship(&id)
            .await
            .map_err(graphql_error)?;
        Ok(starship.map(Starship))
    }

    /// Search humans, droids and starships by name
    async fn search(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Case-insensitive name fragment")]
        text: String,
    ) -> Result<Vec<SearchResult>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let hits = api_ctx
            .characters
            .search(&text)
            .await
            .map_err(graphql_error)?;
        Ok(hits.into_iter().map(SearchResult::from).collect())
    }

    // =========================================================================
    // REVIEW QUERIES
    // =========================================================================

    /// All reviews for an episode, oldest first
    async fn reviews(&self, ctx: &Context<'_>, episode: Episode) -> Result<Vec<Review>> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let reviews = api_ctx
            .reviews
            .get_reviews(episode.into())
            .await
            .map_err(graphql_error)?;
        Ok(reviews.into_iter().map(Review::from).collect())
    }
}
