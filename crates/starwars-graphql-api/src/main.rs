//! # Star Wars GraphQL API Server
//!
//! Binary entry point for the GraphQL API service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use starwars_graphql_api::config::LogFormat;
use starwars_graphql_api::{
    build_router, build_schema, default_policies, interceptor_for, ApiContext, Config,
    SchemaOptions,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!(
        version = starwars_graphql_api::VERSION,
        environment = ?config.environment,
        "Starting Star Wars GraphQL API"
    );

    // Repositories and event registry
    let api_ctx = ApiContext::in_memory(config.event_channel_capacity)?;
    let review_count = api_ctx.reviews.count().await?;
    tracing::info!(review_count, "In-memory repositories seeded");

    // Build GraphQL schema
    let schema = build_schema(api_ctx, default_policies(), SchemaOptions::from_config(&config));

    tracing::info!(
        path = %config.graphql_path,
        playground = config.enable_playground,
        graphiql = config.enable_graphiql,
        introspection = config.enable_introspection,
        max_depth = config.max_query_depth,
        max_complexity = config.max_query_complexity,
        "GraphQL schema built"
    );

    // Build router
    let interceptor = interceptor_for(config.inject_test_identity);
    let app = build_router(schema, interceptor, &config);

    // Start server
    let addr = config.server_addr;
    tracing::info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("GraphQL endpoint at http://{}{}", addr, config.graphql_path);
    tracing::info!("WebSocket subscriptions at ws://{}{}", addr, config.graphql_path);
    if config.enable_playground {
        tracing::info!("GraphQL Playground at http://{}{}", addr, config.playground_path());
    }
    if config.enable_graphiql {
        tracing::info!("GraphiQL at http://{}{}", addr, config.graphiql_path());
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
