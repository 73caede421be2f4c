//! # Star Wars Domain Model
//!
//! Core entities, value objects, and enums for the Star Wars sample
//! service. These types are the single source of truth across all layers:
//! persistence and the GraphQL API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// ENUMS
// =============================================================================

/// Film episodes a character can appear in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Episode {
    NewHope,
    Empire,
    Jedi,
}

impl Episode {
    /// All episodes in release order
    pub const ALL: [Self; 3] = [Self::NewHope, Self::Empire, Self::Jedi];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NewHope => "NEW_HOPE",
            Self::Empire => "EMPIRE",
            Self::Jedi => "JEDI",
        }
    }
}

/// Length units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Unit {
    #[default]
    Meters,
    Foot,
}

impl Unit {
    const FEET_PER_METER: f64 = 3.28084;

    /// Convert a length stored in meters into this unit
    #[must_use]
    pub fn convert_from_meters(self, meters: f64) -> f64 {
        match self {
            Self::Meters => meters,
            Self::Foot => meters * Self::FEET_PER_METER,
        }
    }
}

// =============================================================================
// ENTITIES
// =============================================================================

/// Human character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Human {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub friends: Vec<String>,
    pub appears_in: Vec<Episode>,
    pub home_planet: Option<String>,
    /// Height in meters
    pub height: f64,
}

/// Droid character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Droid {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub friends: Vec<String>,
    pub appears_in: Vec<Episode>,
    pub primary_function: Option<String>,
    /// Height in meters
    pub height: f64,
}

/// Starship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Starship {
    pub id: String,
    pub name: String,
    /// Length in meters
    pub length: f64,
}

/// Any character in the saga
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Character {
    Human(Human),
    Droid(Droid),
}

impl Character {
    pub fn id(&self) -> &str {
        match self {
            Self::Human(h) => &h.id,
            Self::Droid(d) => &d.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Human(h) => &h.name,
            Self::Droid(d) => &d.name,
        }
    }

    pub fn friends(&self) -> &[String] {
        match self {
            Self::Human(h) => &h.friends,
            Self::Droid(d) => &d.friends,
        }
    }

    pub fn appears_in(&self) -> &[Episode] {
        match self {
            Self::Human(h) => &h.appears_in,
            Self::Droid(d) => &d.appears_in,
        }
    }

    /// Height in meters
    pub fn height(&self) -> f64 {
        match self {
            Self::Human(h) => h.height,
            Self::Droid(d) => d.height,
        }
    }
}

impl From<Human> for Character {
    fn from(h: Human) -> Self {
        Self::Human(h)
    }
}

impl From<Droid> for Character {
    fn from(d: Droid) -> Self {
        Self::Droid(d)
    }
}

// =============================================================================
// REVIEWS
// =============================================================================

/// A viewer review of an episode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub episode: Episode,
    pub stars: i32,
    pub commentary: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Review {
    pub const MAX_STARS: i32 = 5;
    pub const MAX_COMMENTARY_LEN: usize = 1000;

    /// Create a validated review
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidReview`] when the star rating is outside
    /// `0..=MAX_STARS` or the commentary is too long.
    pub fn new(
        episode: Episode,
        stars: i32,
        commentary: Option<String>,
    ) -> Result<Self, DomainError> {
        if !(0..=Self::MAX_STARS).contains(&stars) {
            return Err(DomainError::InvalidReview(format!(
                "stars must be between 0 and {}, got {stars}",
                Self::MAX_STARS
            )));
        }

        if let Some(ref text) = commentary {
            if text.chars().count() > Self::MAX_COMMENTARY_LEN {
                return Err(DomainError::InvalidReview(format!(
                    "commentary exceeds {} characters",
                    Self::MAX_COMMENTARY_LEN
                )));
            }
        }

        Ok(Self {
            id: Uuid::new_v4(),
            episode,
            stars,
            commentary,
            created_at: Utc::now(),
        })
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Invalid review: {0}")]
    InvalidReview(String),
}
