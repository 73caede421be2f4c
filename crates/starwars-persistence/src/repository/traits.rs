//! # Repository Traits
//!
//! Abstract repository interfaces for domain entities.
//! Implementations can be swapped for different backends (in-memory, mock, etc.)

use async_trait::async_trait;

use crate::error::Result;
use starwars_domain::{Character, Droid, Episode, Human, Review, Starship};

// =============================================================================
// SEARCH
// =============================================================================

/// A single full-text search match
#[derive(Debug, Clone, PartialEq)]
pub enum SearchHit {
    Human(Human),
    Droid(Droid),
    Starship(Starship),
}

// =============================================================================
// CHARACTER REPOSITORY
// =============================================================================

/// Repository for characters and starships
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Get any character by ID
    async fn get_character(&self, id: &str) -> Result<Option<Character>>;

    /// Get characters by ID, skipping unknown IDs and keeping request order
    async fn get_characters(&self, ids: &[String]) -> Result<Vec<Character>>;

    /// Get the hero of an episode
    async fn get_hero(&self, episode: Episode) -> Result<Character>;

    /// Get human by ID
    async fn get_human(&self, id: &str) -> Result<Option<Human>>;

    /// Get droid by ID
    async fn get_droid(&self, id: &str) -> Result<Option<Droid>>;

    /// Get starship by ID
    async fn get_starship(&self, id: &str) -> Result<Option<Starship>>;

    /// Resolve a character's friend list
    async fn get_friends(&self, character: &Character) -> Result<Vec<Character>> {
        self.get_characters(character.friends()).await
    }

    /// Case-insensitive name search across humans, droids and starships
    async fn search(&self, text: &str) -> Result<Vec<SearchHit>>;
}

// =============================================================================
// REVIEW REPOSITORY
// =============================================================================

/// Repository for episode reviews
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Store a review and return the stored copy
    async fn add_review(&self, review: Review) -> Result<Review>;

    /// Get all reviews for an episode in insertion order
    async fn get_reviews(&self, episode: Episode) -> Result<Vec<Review>>;

    /// Total number of stored reviews
    async fn count(&self) -> Result<usize>;
}
