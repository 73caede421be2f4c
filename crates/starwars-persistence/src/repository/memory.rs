//! In-memory repository implementations.
//!
//! Characters and starships are read-only and loaded once from a JSON seed.
//! Reviews are appended at runtime and live for the lifetime of the process.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::traits::{CharacterRepository, ReviewRepository, SearchHit};
use crate::error::{PersistenceError, Result};
use starwars_domain::{Character, Droid, Episode, Human, Review, Starship};

/// Canonical seed data compiled into the binary
const SEED_JSON: &str = include_str!("../../data/seed.json");

const HERO_OF_EMPIRE: &str = "1000";
const HERO_DEFAULT: &str = "2001";

// =============================================================================
// CHARACTER REPOSITORY
// =============================================================================

#[derive(Debug, Deserialize)]
struct Seed {
    #[serde(default)]
    humans: Vec<Human>,
    #[serde(default)]
    droids: Vec<Droid>,
    #[serde(default)]
    starships: Vec<Starship>,
}

/// Read-only character and starship store.
#[derive(Debug, Default)]
pub struct InMemoryCharacterRepository {
    humans: Vec<Human>,
    droids: Vec<Droid>,
    starships: Vec<Starship>,
    index: HashMap<String, Entry>,
}

/// Position of an ID inside one of the entity vectors
#[derive(Debug, Clone, Copy)]
enum Entry {
    Human(usize),
    Droid(usize),
    Starship(usize),
}

impl InMemoryCharacterRepository {
    /// Load the canonical seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded seed is malformed.
    pub fn from_seed() -> Result<Self> {
        Self::from_json(SEED_JSON)
    }

    /// Load characters from a JSON document with `humans`, `droids` and
    /// `starships` arrays.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Serialization`] for invalid JSON and
    /// [`PersistenceError::DuplicateKey`] when two entities share an ID.
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Seed = serde_json::from_str(json)?;
        let mut index = HashMap::new();

        let keys = seed
            .humans
            .iter()
            .enumerate()
            .map(|(i, h)| (h.id.as_str(), "Human", Entry::Human(i)))
            .chain(
                seed.droids
                    .iter()
                    .enumerate()
                    .map(|(i, d)| (d.id.as_str(), "Droid", Entry::Droid(i))),
            )
            .chain(
                seed.starships
                    .iter()
                    .enumerate()
                    .map(|(i, s)| (s.id.as_str(), "Starship", Entry::Starship(i))),
            );

        for (id, entity_type, entry) in keys {
            if index.insert(id.to_string(), entry).is_some() {
                return Err(PersistenceError::DuplicateKey {
                    entity_type: entity_type.to_string(),
                    key: id.to_string(),
                });
            }
        }

        tracing::debug!(
            humans = seed.humans.len(),
            droids = seed.droids.len(),
            starships = seed.starships.len(),
            "Character seed loaded"
        );

        Ok(Self {
            humans: seed.humans,
            droids: seed.droids,
            starships: seed.starships,
            index,
        })
    }

    fn lookup_character(&self, id: &str) -> Option<Character> {
        match self.index.get(id)? {
            Entry::Human(i) => self.humans.get(*i).cloned().map(Character::Human),
            Entry::Droid(i) => self.droids.get(*i).cloned().map(Character::Droid),
            Entry::Starship(_) => None,
        }
    }
}

#[async_trait]
impl CharacterRepository for InMemoryCharacterRepository {
    async fn get_character(&self, id: &str) -> Result<Option<Character>> {
        Ok(self.lookup_character(id))
    }

    async fn get_characters(&self, ids: &[String]) -> Result<Vec<Character>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.lookup_character(id))
            .collect())
    }

    async fn get_hero(&self, episode: Episode) -> Result<Character> {
        let id = match episode {
            Episode::Empire => HERO_OF_EMPIRE,
            Episode::NewHope | Episode::Jedi => HERO_DEFAULT,
        };

        self.lookup_character(id)
            .ok_or_else(|| PersistenceError::not_found("Character", id))
    }

    async fn get_human(&self, id: &str) -> Result<Option<Human>> {
        Ok(match self.index.get(id) {
            Some(Entry::Human(i)) => self.humans.get(*i).cloned(),
            _ => None,
        })
    }

    async fn get_droid(&self, id: &str) -> Result<Option<Droid>> {
        Ok(match self.index.get(id) {
            Some(Entry::Droid(i)) => self.droids.get(*i).cloned(),
            _ => None,
        })
    }

    async fn get_starship(&self, id: &str) -> Result<Option<Starship>> {
        Ok(match self.index.get(id) {
            Some(Entry::Starship(i)) => self.starships.get(*i).cloned(),
            _ => None,
        })
    }

    async fn search(&self, text: &str) -> Result<Vec<SearchHit>> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let matches = |name: &str| name.to_lowercase().contains(&needle);

        let hits: Vec<SearchHit> = self
            .humans
            .iter()
            .filter(|h| matches(&h.name))
            .cloned()
            .map(SearchHit::Human)
            .chain(
                self.droids
                    .iter()
                    .filter(|d| matches(&d.name))
                    .cloned()
                    .map(SearchHit::Droid),
            )
            .chain(
                self.starships
                    .iter()
                    .filter(|s| matches(&s.name))
                    .cloned()
                    .map(SearchHit::Starship),
            )
            .collect();

        tracing::debug!(text = %text, hits = hits.len(), "Search executed");
        Ok(hits)
    }
}

// =============================================================================
// REVIEW REPOSITORY
// =============================================================================

/// Review store keyed by episode.
#[derive(Debug, Default)]
pub struct InMemoryReviewRepository {
    reviews: RwLock<HashMap<Episode, Vec<Review>>>,
}

impl InMemoryReviewRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn add_review(&self, review: Review) -> Result<Review> {
        let mut reviews = self.reviews.write().await;
        reviews
            .entry(review.episode)
            .or_default()
            .push(review.clone());

        tracing::debug!(
            review_id = %review.id,
            episode = review.episode.as_str(),
            stars = review.stars,
            "Review stored"
        );
        Ok(review)
    }

    async fn get_reviews(&self, episode: Episode) -> Result<Vec<Review>> {
        let reviews = self.reviews.read().await;
        Ok(reviews.get(&episode).cloned().unwrap_or_default())
    }

    async fn count(&self) -> Result<usize> {
        let reviews = self.reviews.read().await;
        Ok(reviews.values().map(Vec::len).sum())
    }
}
