//! # Star Wars Persistence Library
//!
//! Repository layer for the Star Wars GraphQL service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Application Layer                        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Repository Traits                          │
//! │          (CharacterRepository, ReviewRepository)             │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │  Character Store        │   │       Review Store           │
//! │  (embedded JSON seed)   │   │  (append-only, RwLock)       │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use starwars_persistence::{init_in_memory, CharacterRepository};
//!
//! let (characters, reviews) = init_in_memory()?;
//! let hero = characters.get_hero(Episode::Empire).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod repository;

// Re-export commonly used types
pub use error::{PersistenceError, Result};
pub use repository::{
    CharacterRepository, InMemoryCharacterRepository, InMemoryReviewRepository,
    ReviewRepository, SearchHit,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize both repositories with the canonical seed
///
/// # Errors
///
/// Returns an error if the embedded character seed cannot be parsed.
pub fn init_in_memory() -> Result<(InMemoryCharacterRepository, InMemoryReviewRepository)> {
    let characters = InMemoryCharacterRepository::from_seed()?;
    let reviews = InMemoryReviewRepository::new();
    Ok((characters, reviews))
}
