//! # Schema Composition
//!
//! Merges the Star Wars schema segment with the service configuration
//! segment into one executable schema.
//!
//! ```text
//!   StarWarsQuery ──┐
//!                   ├──► QueryRoot ───────┐
//!   ServiceQuery ───┘                     │
//!   StarWarsMutation ──► MutationRoot ────┼──► ApiSchema
//!   StarWarsSubscription ► SubscriptionRoot┘     + ApiContext
//!                                                + AuthorizationOptions
//!                                                + PagingOptions
//! ```

use async_graphql::{MergedObject, MergedSubscription, Schema, SchemaBuilder};

use crate::auth::AuthorizationOptions;
use crate::config::Config;
use crate::context::ApiContext;
use crate::resolvers::{ServiceQuery, StarWarsMutation, StarWarsQuery, StarWarsSubscription};
use crate::schema::{Character, PagingOptions, SearchResult};

#[derive(MergedObject, Default)]
pub struct QueryRoot(StarWarsQuery, ServiceQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(StarWarsMutation);

#[derive(MergedSubscription, Default)]
pub struct SubscriptionRoot(StarWarsSubscription);

/// GraphQL schema type
pub type ApiSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Execution limits and schema-wide settings
#[derive(Debug, Clone, Copy)]
pub struct SchemaOptions {
    pub max_query_depth: usize,
    pub max_query_complexity: usize,
    pub enable_introspection: bool,
    pub paging: PagingOptions,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SchemaOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_query_depth: config.max_query_depth,
            max_query_complexity: config.max_query_complexity,
            enable_introspection: config.enable_introspection,
            paging: PagingOptions {
                default_page_size: PagingOptions::default()
                    .default_page_size
                    .min(config.max_page_size),
                max_page_size: config.max_page_size,
            },
        }
    }
}

/// Schema builder with every segment and type registered but no data
pub fn schema_builder() -> SchemaBuilder<QueryRoot, MutationRoot, SubscriptionRoot> {
    Schema::build(
        QueryRoot::default(),
        MutationRoot::default(),
        SubscriptionRoot::default(),
    )
    .register_output_type::<Character>()
    .register_output_type::<SearchResult>()
}

/// Build the GraphQL schema with context
pub fn build_schema(
    ctx: ApiContext,
    policies: AuthorizationOptions,
    options: SchemaOptions,
) -> ApiSchema {
    let mut builder = schema_builder()
        .data(ctx)
        .data(policies)
        .data(options.paging)
        .limit_depth(options.max_query_depth)
        .limit_complexity(options.max_query_complexity);

    if !options.enable_introspection {
        builder = builder.disable_introspection();
    }

    tracing::debug!(
        max_depth = options.max_query_depth,
        max_complexity = options.max_query_complexity,
        introspection = options.enable_introspection,
        max_page_size = options.paging.max_page_size,
        "GraphQL schema composed"
    );

    builder.finish()
}

/// Schema definition language of the composed schema
pub fn schema_sdl() -> String {
    schema_builder().finish().sdl()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sdl_contains_every_segment() {
        let sdl = schema_sdl();
        for needle in [
            "interface Character",
            "type Human implements Character",
            "type Droid implements Character",
            "enum Episode",
            "scalar PaginationAmount",
            "union SearchResult",
            "hero(",
            "health:",
            "createReview(",
            "onReview(",
        ] {
            assert!(sdl.contains(needle), "SDL is missing `{needle}`");
        }
    }

    #[test]
    fn test_sdl_describes_arguments() {
        let sdl = schema_sdl();
        for desc in [
            "Case-insensitive name fragment",
            "Number of friends to return",
            "Episode to receive reviews for",
        ] {
            assert!(sdl.contains(desc), "SDL is missing argument description `{desc}`");
        }
    }

    #[test]
    fn test_options_follow_config() {
        let config = Config {
            max_page_size: 5,
            enable_introspection: false,
            ..Config::default()
        };
        let options = SchemaOptions::from_config(&config);
        assert_eq!(options.paging.max_page_size, 5);
        assert_eq!(options.paging.default_page_size, 5);
        assert!(!options.enable_introspection);
    }
}
