//! # GraphQL Input Types
//!
//! Input object definitions for mutations.

use async_graphql::InputObject;

/// The input object sent when someone is creating a new review
#[derive(Debug, Clone, InputObject)]
pub struct ReviewInput {
    /// 0-5 stars
    #[graphql(validator(minimum = 0, maximum = 5))]
    pub stars: i32,
    /// Comment about the movie, optional
    pub commentary: Option<String>,
}
