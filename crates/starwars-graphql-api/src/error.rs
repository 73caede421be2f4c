//! # API Error Types
//!
//! Unified error handling for the GraphQL API layer.

use async_graphql::{Error as GraphQLError, ErrorExtensions};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use starwars_domain::DomainError;
use starwars_persistence::PersistenceError;

/// API-level errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Persistence error: {0}")]
    Persistence(#[source] PersistenceError),

    #[error("The current user is not authenticated")]
    NotAuthenticated,

    #[error("The current user is not authorized to access this resource (policy '{policy}')")]
    NotAuthorized { policy: String },

    #[error("Authorization policy '{0}' is not registered")]
    UnknownPolicy(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::NotAuthenticated => StatusCode::UNAUTHORIZED,
            Self::NotAuthorized { .. } => StatusCode::FORBIDDEN,
            Self::Persistence(_) | Self::UnknownPolicy(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for GraphQL extensions
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
            Self::NotAuthenticated => "AUTH_NOT_AUTHENTICATED",
            Self::NotAuthorized { .. } => "AUTH_NOT_AUTHORIZED",
            Self::UnknownPolicy(_) => "AUTH_POLICY_NOT_FOUND",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidReview(msg) => Self::InvalidInput(msg),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity_type, key } => Self::NotFound {
                entity_type,
                id: key,
            },
            other => Self::Persistence(other),
        }
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> GraphQLError {
        GraphQLError::new(self.to_string()).extend_with(|_, e| {
            e.set("code", self.error_code());
            e.set("status", self.status_code().as_u16());

            match self {
                Self::NotFound { entity_type, id } => {
                    e.set("entity_type", entity_type.as_str());
                    e.set("entity_id", id.as_str());
                }
                Self::NotAuthorized { policy } | Self::UnknownPolicy(policy) => {
                    e.set("policy", policy.as_str());
                }
                _ => {}
            }
        })
    }
}

/// Convert a resolver-side failure into a GraphQL error carrying `code`,
/// `status` and, where relevant, `policy` extensions
///
/// async-graphql converts any `Display` type into a bare error, so every
/// resolver goes through here instead of `?` on an [`ApiError`].
pub fn graphql_error(err: impl Into<ApiError>) -> GraphQLError {
    err.into().extend()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = serde_json::json!({
            "error": {
                "message": self.to_string(),
                "code": self.error_code(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_code_mapping() {
        let err = ApiError::NotAuthorized {
            policy: "HasCountry".to_string(),
        };
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.error_code(), "AUTH_NOT_AUTHORIZED");

        assert_eq!(ApiError::NotAuthenticated.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::UnknownPolicy("x".into()).error_code(),
            "AUTH_POLICY_NOT_FOUND"
        );
    }

    #[test]
    fn test_domain_error_conversion() {
        let err = ApiError::from(DomainError::InvalidReview("stars".into()));
        assert!(matches!(err, ApiError::InvalidInput(_)));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_graphql_extensions_carry_code() {
        let gql = graphql_error(ApiError::NotAuthorized {
            policy: "HasCountry".to_string(),
        });
        let extensions = gql.extensions.expect("extensions set");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("AUTH_NOT_AUTHORIZED"))
        );
        assert_eq!(
            extensions.get("policy"),
            Some(&async_graphql::Value::from("HasCountry"))
        );
    }

    #[test]
    fn test_persistence_not_found_maps_to_not_found() {
        let err = ApiError::from(PersistenceError::NotFound {
            entity_type: "Character".to_string(),
            key: "1000".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.error_code(), "NOT_FOUND");

        let gql = graphql_error(err);
        let extensions = gql.extensions.expect("extensions set");
        assert_eq!(
            extensions.get("entity_id"),
            Some(&async_graphql::Value::from("1000"))
        );
    }

    #[test]
    fn test_other_persistence_errors_stay_internal() {
        let err = ApiError::from(PersistenceError::DuplicateKey {
            entity_type: "Human".to_string(),
            key: "1000".to_string(),
        });
        assert!(matches!(err, ApiError::Persistence(_)));
        assert_eq!(err.error_code(), "PERSISTENCE_ERROR");
    }

    #[test]
    fn test_domain_errors_keep_extensions_through_helper() {
        let gql = graphql_error(DomainError::InvalidReview("stars".into()));
        let extensions = gql.extensions.expect("extensions set");
        assert_eq!(
            extensions.get("code"),
            Some(&async_graphql::Value::from("INVALID_INPUT"))
        );
    }
}
