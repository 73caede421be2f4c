//! # Service Query Segment
//!
//! Operational fields merged into the query root next to the Star Wars
//! schema.

use async_graphql::{Context, Object, Result};

use crate::context::ApiContext;
use crate::error::graphql_error;

/// Queries contributed by the service configuration
#[derive(Default)]
pub struct ServiceQuery;

#[Object]
impl ServiceQuery {
    /// API health check
    async fn health(&self) -> Result<String> {
        Ok("OK".to_string())
    }

    /// API version
    async fn version(&self) -> Result<String> {
        Ok(crate::VERSION.to_string())
    }

    /// Number of reviews stored since startup
    async fn review_count(&self, ctx: &Context<'_>) -> Result<i32> {
        let api_ctx = ctx.data::<ApiContext>()?;
        let count = api_ctx.reviews.count().await.map_err(graphql_error)?;
        Ok(i32::try_from(count).unwrap_or(i32::MAX))
    }
}
