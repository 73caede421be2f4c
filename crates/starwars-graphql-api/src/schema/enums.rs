//! # GraphQL Enum Types
//!
//! Enum definitions for the GraphQL schema.

use async_graphql::Enum;
use starwars_domain as domain;

/// One of the films in the Star Wars trilogy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
#[graphql(rename_items = "SCREAMING_SNAKE_CASE")]
pub enum Episode {
    /// Released in 1977
    NewHope,
    /// Released in 1980
    Empire,
    /// Released in 1983
    Jedi,
}

impl From<domain::Episode> for Episode {
    fn from(e: domain::Episode) -> Self {
        match e {
            domain::Episode::NewHope => Self::NewHope,
            domain::Episode::Empire => Self::Empire,
            domain::Episode::Jedi => Self::Jedi,
        }
    }
}

impl From<Episode> for domain::Episode {
    fn from(e: Episode) -> Self {
        match e {
            Episode::NewHope => Self::NewHope,
            Episode::Empire => Self::Empire,
            Episode::Jedi => Self::Jedi,
        }
    }
}

/// Units of length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Enum)]
#[graphql(rename_items = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    /// Metric meters
    #[default]
    Meters,
    /// Imperial feet
    Foot,
}

impl From<Unit> for domain::Unit {
    fn from(u: Unit) -> Self {
        match u {
            Unit::Meters => Self::Meters,
            Unit::Foot => Self::Foot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_round_trip_through_domain() {
        for episode in domain::Episode::ALL {
            assert_eq!(domain::Episode::from(Episode::from(episode)), episode);
        }
    }
}
