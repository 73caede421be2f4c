//! # GraphQL Resolvers Module
//!
//! Query, Mutation, and Subscription resolvers, grouped by the schema
//! segment that contributes them.

pub mod mutation;
pub mod query;
pub mod service;
pub mod subscription;

pub use mutation::StarWarsMutation;
pub use query::StarWarsQuery;
pub use service::ServiceQuery;
pub use subscription::StarWarsSubscription;
