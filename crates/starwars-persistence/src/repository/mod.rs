//! # Repository Module
//!
//! Repository pattern implementations for domain entity persistence.

pub mod memory;
pub mod traits;

pub use memory::{InMemoryCharacterRepository, InMemoryReviewRepository};
pub use traits::{CharacterRepository, ReviewRepository, SearchHit};
