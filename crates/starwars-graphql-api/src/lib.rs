//! # Star Wars GraphQL API
//!
//! GraphQL service for the Star Wars sample schema.
//!
//! ## Features
//!
//! - **Composed Schema**: Star Wars queries, mutations and subscriptions
//!   merged with service-level fields
//! - **Policy Authorization**: named claim policies enforced by field guards
//! - **Subscriptions**: review events over WebSocket on the GraphQL path
//! - **IDEs**: GraphQL Playground and GraphiQL served beneath the GraphQL path
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Axum HTTP Server                         │
//! │     (GraphQL endpoint + WebSocket + Playground/GraphiQL)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │  RequestInterceptor
//!                              ▼  (attaches ClaimsPrincipal)
//! ┌─────────────────────────────────────────────────────────────┐
//! │                async-graphql Schema                         │
//! │        (QueryRoot, MutationRoot, SubscriptionRoot)          │
//! │                 PolicyGuard on guarded fields               │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ApiContext                               │
//! │          (Repositories, In-memory Event Registry)           │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod resolvers;
pub mod schema;
pub mod stitching;

use std::any::Any;
use std::sync::Arc;

use async_graphql::http::{
    playground_source, GraphQLPlaygroundConfig, GraphiQLSource, ALL_WEBSOCKET_PROTOCOLS,
};
use async_graphql_axum::{GraphQLProtocol, GraphQLRequest, GraphQLResponse, GraphQLWebSocket};
use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocketUpgrade},
        RawQuery, State,
    },
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyHeaders, CorsLayer};
use tower_http::trace::TraceLayer;

pub use auth::{default_policies, interceptor_for, SharedInterceptor};
pub use config::Config;
pub use context::{ApiContext, ApiContextBuilder};
pub use error::{ApiError, ApiResult};
pub use stitching::{build_schema, schema_sdl, ApiSchema, SchemaOptions};

/// Application state for Axum handlers
#[derive(Clone)]
pub struct AppState {
    pub schema: ApiSchema,
    pub interceptor: SharedInterceptor,
    pub graphql_path: Arc<str>,
}

/// GraphQL POST handler
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request = state.interceptor.on_create_request(&headers, req.into_inner());
    state.schema.execute(request).await.into()
}

/// GraphQL GET handler
///
/// Upgrades to a GraphQL WebSocket when the client asks for one, otherwise
/// executes the request encoded in the query string.
pub async fn graphql_get_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    protocol: Result<GraphQLProtocol, StatusCode>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
    RawQuery(query): RawQuery,
) -> Response {
    if let Ok(ws) = upgrade {
        let Ok(protocol) = protocol else {
            return ApiError::InvalidInput("unsupported GraphQL WebSocket subprotocol".to_string())
                .into_response();
        };
        return graphql_ws_upgrade(&state, &headers, protocol, ws);
    }

    let Some(query) = query.filter(|q| !q.trim().is_empty()) else {
        return ApiError::InvalidInput("missing GraphQL query string".to_string()).into_response();
    };

    let request = match async_graphql::http::parse_query_string(&query) {
        Ok(request) if !request.query.trim().is_empty() => request,
        Ok(_) => {
            return ApiError::InvalidInput("empty GraphQL query".to_string()).into_response();
        }
        Err(err) => return ApiError::InvalidInput(err.to_string()).into_response(),
    };

    let request = state.interceptor.on_create_request(&headers, request);
    GraphQLResponse::from(state.schema.execute(request).await).into_response()
}

fn graphql_ws_upgrade(
    state: &AppState,
    headers: &HeaderMap,
    protocol: GraphQLProtocol,
    ws: WebSocketUpgrade,
) -> Response {
    let schema = state.schema.clone();
    let session_data = state.interceptor.on_create_session(headers);
    tracing::debug!("Upgrading GraphQL WebSocket");

    ws.protocols(ALL_WEBSOCKET_PROTOCOLS)
        .on_upgrade(move |stream| {
            GraphQLWebSocket::new(stream, schema, protocol)
                .with_data(session_data)
                .serve()
        })
        .into_response()
}

/// GraphQL Playground HTML
pub async fn graphql_playground(State(state): State<AppState>) -> impl IntoResponse {
    Html(playground_source(
        GraphQLPlaygroundConfig::new(&state.graphql_path).subscription_endpoint(&state.graphql_path),
    ))
}

/// GraphiQL HTML
pub async fn graphiql(State(state): State<AppState>) -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint(&state.graphql_path)
            .subscription_endpoint(&state.graphql_path)
            .finish(),
    )
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

fn panic_message(err: &(dyn Any + Send)) -> String {
    err.downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| (*s).to_string()))
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// 500 response exposing the panic message
fn developer_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic_message(err.as_ref());
    tracing::error!(panic = %message, "Handler panicked");
    ApiError::Internal(message).into_response()
}

/// 500 response hiding the panic message from the caller
fn generic_panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!(panic = %panic_message(err.as_ref()), "Handler panicked");
    ApiError::Internal("unexpected error".to_string()).into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_origin(allow_origin)
        .allow_headers(AnyHeaders)
}

/// Build the Axum router
pub fn build_router(schema: ApiSchema, interceptor: SharedInterceptor, config: &Config) -> Router {
    let state = AppState {
        schema,
        interceptor,
        graphql_path: Arc::from(config.graphql_path.as_str()),
    };

    let mut router = Router::new()
        // GraphQL endpoint: POST queries, GET queries and WebSocket upgrades
        .route(
            &config.graphql_path,
            get(graphql_get_handler).post(graphql_handler),
        )
        .route("/health", get(health_check))
        .route("/", get(|| async { "Star Wars GraphQL API" }));

    if config.enable_playground {
        router = router.route(&config.playground_path(), get(graphql_playground));
    }
    if config.enable_graphiql {
        router = router.route(&config.graphiql_path(), get(graphiql));
    }

    with_middleware(router.with_state(state), config)
}

/// Wrap a router in the CORS, tracing and panic-catching layers
///
/// In development the panic message is returned in the 500 body.
pub fn with_middleware(router: Router, config: &Config) -> Router {
    let panic_handler: fn(Box<dyn Any + Send + 'static>) -> Response = if config.is_development() {
        developer_panic_response
    } else {
        generic_panic_response
    };

    router
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_handler))
}

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message_extraction() {
        let owned: Box<dyn Any + Send> = Box::new(String::from("boom"));
        assert_eq!(panic_message(owned.as_ref()), "boom");

        let borrowed: Box<dyn Any + Send> = Box::new("bang");
        assert_eq!(panic_message(borrowed.as_ref()), "bang");

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_developer_panic_response_exposes_message() {
        let response = developer_panic_response(Box::new("reactor core breach"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("reactor core breach"));
    }

    #[tokio::test]
    async fn test_generic_panic_response_hides_message() {
        let response = generic_panic_response(Box::new("reactor core breach"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_text(response).await;
        assert!(!body.contains("reactor core breach"));
        assert!(body.contains("INTERNAL_ERROR"));
    }
}
