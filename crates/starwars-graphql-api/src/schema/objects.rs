//! # GraphQL Output Types
//!
//! Object, interface and union definitions for GraphQL responses.

use async_graphql::{Context, Interface, Object, Result, SimpleObject, Union, ID};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::connection::{paginate, CharacterConnection, PagingOptions};
use super::enums::{Episode, Unit};
use super::scalars::PaginationAmount;
use crate::auth::{PolicyGuard, HAS_COUNTRY};
use crate::context::ApiContext;
use crate::error::graphql_error;
use starwars_domain as domain;

// =============================================================================
// CHARACTERS
// =============================================================================

/// A character in the Star Wars trilogy
#[derive(Debug, Clone, Interface)]
#[graphql(
    field(name = "id", ty = "ID", desc = "The id of the character"),
    field(name = "name", ty = "&str", desc = "The name of the character"),
    field(
        name = "appears_in",
        ty = "Vec<Episode>",
        desc = "Which movies they appear in"
    )
)]
pub enum Character {
    Human(Human),
    Droid(Droid),
}

impl Character {
    /// Raw character ID
    pub fn id_str(&self) -> &str {
        match self {
            Self::Human(h) => &h.0.id,
            Self::Droid(d) => &d.0.id,
        }
    }
}

impl From<domain::Character> for Character {
    fn from(c: domain::Character) -> Self {
        match c {
            domain::Character::Human(h) => Self::Human(Human(h)),
            domain::Character::Droid(d) => Self::Droid(Droid(d)),
        }
    }
}

async fn resolve_friends(ctx: &Context<'_>, friend_ids: &[String]) -> Result<Vec<Character>> {
    let api_ctx = ctx.data::<ApiContext>()?;
    let friends = api_ctx
        .characters
        .get_characters(friend_ids)
        .await
        .map_err(graphql_error)?;
    Ok(friends.into_iter().map(Character::from).collect())
}

async fn resolve_friends_connection(
    ctx: &Context<'_>,
    friend_ids: &[String],
    first: Option<PaginationAmount>,
    after: Option<String>,
) -> Result<CharacterConnection> {
    let options = ctx
        .data_opt::<PagingOptions>()
        .copied()
        .unwrap_or_default();
    let friends = resolve_friends(ctx, friend_ids).await?;
    paginate(friends, first, after.as_deref(), options).map_err(graphql_error)
}

fn episodes(appears_in: &[domain::Episode]) -> Vec<Episode> {
    appears_in.iter().copied().map(Episode::from).collect()
}

/// A humanoid creature in the Star Wars universe
#[derive(Debug, Clone)]
pub struct Human(pub domain::Human);

#[Object]
impl Human {
    /// The id of the human
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    /// The name of the human
    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Which movies they appear in
    async fn appears_in(&self) -> Vec<Episode> {
        episodes(&self.0.appears_in)
    }

    /// The friends of the human, or an empty list if they have none
    async fn friends(&self, ctx: &Context<'_>) -> Result<Vec<Character>> {
        resolve_friends(ctx, &self.0.friends).await
    }

    /// The friends of the human as a paginated connection
    async fn friends_connection(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Number of friends to return")]
        first: Option<PaginationAmount>,
        #[graphql(desc = "Cursor of the last friend already seen")]
        after: Option<String>,
    ) -> Result<CharacterConnection> {
        resolve_friends_connection(ctx, &self.0.friends, first, after).await
    }

    /// The home planet of the human, or null if unknown
    ///
    /// Requires the `HasCountry` policy.
    #[graphql(guard = "PolicyGuard::new(HAS_COUNTRY)")]
    async fn home_planet(&self) -> Option<&str> {
        self.0.home_planet.as_deref()
    }

    /// Height in the preferred unit, default is meters
    async fn height(&self, #[graphql(default)] unit: Unit) -> f64 {
        domain::Unit::from(unit).convert_from_meters(self.0.height)
    }
}

/// A mechanical creature in the Star Wars universe
#[derive(Debug, Clone)]
pub struct Droid(pub domain::Droid);

#[Object]
impl Droid {
    /// The id of the droid
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    /// The name of the droid
    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Which movies they appear in
    async fn appears_in(&self) -> Vec<Episode> {
        episodes(&self.0.appears_in)
    }

    /// The friends of the droid, or an empty list if they have none
    async fn friends(&self, ctx: &Context<'_>) -> Result<Vec<Character>> {
        resolve_friends(ctx, &self.0.friends).await
    }

    /// The friends of the droid as a paginated connection
    async fn friends_connection(
        &self,
        ctx: &Context<'_>,
        first: Option<PaginationAmount>,
        after: Option<String>,
    ) -> Result<CharacterConnection> {
        resolve_friends_connection(ctx, &self.0.friends, first, after).await
    }

    /// The primary function of the droid
    async fn primary_function(&self) -> Option<&str> {
        self.0.primary_function.as_deref()
    }

    /// Height in the preferred unit, default is meters
    async fn height(&self, #[graphql(default)] unit: Unit) -> f64 {
        domain::Unit::from(unit).convert_from_meters(self.0.height)
    }
}

// =============================================================================
// STARSHIPS & SEARCH
// =============================================================================

#[derive(Debug, Clone)]
pub struct Starship(pub domain::Starship);

#[Object]
impl Starship {
    async fn id(&self) -> ID {
        ID(self.0.id.clone())
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Length of the starship, along the longest axis
    async fn length(&self, #[graphql(default)] unit: Unit) -> f64 {
        domain::Unit::from(unit).convert_from_meters(self.0.length)
    }
}

#[derive(Debug, Clone, Union)]
pub enum SearchResult {
    Human(Human),
    Droid(Droid),
    Starship(Starship),
}

impl From<starwars_persistence::SearchHit> for SearchResult {
    fn from(hit: starwars_persistence::SearchHit) -> Self {
        use starwars_persistence::SearchHit;

        match hit {
            SearchHit::Human(h) => Self::Human(Human(h)),
            SearchHit::Droid(d) => Self::Droid(Droid(d)),
            SearchHit::Starship(s) => Self::Starship(Starship(s)),
        }
    }
}

// =============================================================================
// REVIEWS
// =============================================================================

/// A review of an episode
#[derive(Debug, Clone, SimpleObject)]
pub struct Review {
    pub id: Uuid,
    /// The movie
    pub episode: Episode,
    /// The number of stars this review gave, 0-5
    pub stars: i32,
    /// Comment about the movie
    pub commentary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<domain::Review> for Review {
    fn from(r: domain::Review) -> Self {
        Self {
            id: r.id,
            episode: r.episode.into(),
            stars: r.stars,
            commentary: r.commentary,
            created_at: r.created_at,
        }
    }
}
