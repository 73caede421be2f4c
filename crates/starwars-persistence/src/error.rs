//! Persistence layer error types

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: String, key: String },

    #[error("Duplicate key: {entity_type} with key {key}")]
    DuplicateKey { entity_type: String, key: String },
}

impl PersistenceError {
    pub(crate) fn not_found(entity_type: &str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            key: key.into(),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
