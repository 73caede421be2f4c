//! # API Configuration
//!
//! Environment-based configuration for the GraphQL API service.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

/// Hosting environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Hosting environment
    pub environment: Environment,

    /// Server bind address
    pub server_addr: SocketAddr,

    /// Path of the GraphQL endpoint; IDEs are served beneath it
    pub graphql_path: String,

    /// Enable GraphQL Playground
    pub enable_playground: bool,

    /// Enable GraphiQL
    pub enable_graphiql: bool,

    /// Enable GraphQL introspection
    pub enable_introspection: bool,

    /// Maximum query depth
    pub max_query_depth: usize,

    /// Maximum query complexity
    pub max_query_complexity: usize,

    /// Largest page a connection field returns; checked when paginating
    pub max_page_size: i32,

    /// Buffered messages per subscription topic
    pub event_channel_capacity: usize,

    /// Replace every caller identity with the fixed test identity
    pub inject_test_identity: bool,

    /// Logging level
    pub log_level: String,

    /// Logging format
    pub log_format: LogFormat,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            server_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            graphql_path: "/graphql".to_string(),
            enable_playground: true,
            enable_graphiql: true,
            enable_introspection: true,
            // introspection queries need a depth of roughly 13
            max_query_depth: 15,
            max_query_complexity: 1000,
            max_page_size: 50,
            event_channel_capacity: 1024,
            inject_test_identity: false,
            log_level: "info".to_string(),
            log_format: LogFormat::Json,
            cors_origins: vec!["*".to_string()],
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set to a value
    /// that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("APP_ENV") {
            None => defaults.environment,
            Some(v) => match v.to_lowercase().as_str() {
                "development" | "dev" => Environment::Development,
                "production" | "prod" => Environment::Production,
                _ => return Err(invalid("APP_ENV", v)),
            },
        };

        let log_format = match get("LOG_FORMAT") {
            None => defaults.log_format,
            Some(v) => match v.to_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" => LogFormat::Pretty,
                _ => return Err(invalid("LOG_FORMAT", v)),
            },
        };

        let graphql_path = match get("GRAPHQL_PATH") {
            None => defaults.graphql_path,
            Some(v) => validate_path(v)?,
        };

        let max_page_size: i32 = parse_or("MAX_PAGE_SIZE", get("MAX_PAGE_SIZE"), defaults.max_page_size)?;
        if max_page_size < 1 {
            return Err(invalid("MAX_PAGE_SIZE", max_page_size.to_string()));
        }

        let event_channel_capacity: usize = parse_or(
            "EVENT_CHANNEL_CAPACITY",
            get("EVENT_CHANNEL_CAPACITY"),
            defaults.event_channel_capacity,
        )?;
        if event_channel_capacity == 0 {
            return Err(invalid("EVENT_CHANNEL_CAPACITY", "0".to_string()));
        }

        Ok(Self {
            environment,
            server_addr: parse_or("SERVER_ADDR", get("SERVER_ADDR"), defaults.server_addr)?,
            graphql_path,
            enable_playground: bool_or(
                "ENABLE_PLAYGROUND",
                get("ENABLE_PLAYGROUND"),
                defaults.enable_playground,
            )?,
            enable_graphiql: bool_or("ENABLE_GRAPHIQL", get("ENABLE_GRAPHIQL"), defaults.enable_graphiql)?,
            enable_introspection: bool_or(
                "ENABLE_INTROSPECTION",
                get("ENABLE_INTROSPECTION"),
                defaults.enable_introspection,
            )?,
            max_query_depth: parse_or("MAX_QUERY_DEPTH", get("MAX_QUERY_DEPTH"), defaults.max_query_depth)?,
            max_query_complexity: parse_or(
                "MAX_QUERY_COMPLEXITY",
                get("MAX_QUERY_COMPLEXITY"),
                defaults.max_query_complexity,
            )?,
            max_page_size,
            event_channel_capacity,
            inject_test_identity: bool_or(
                "INJECT_TEST_IDENTITY",
                get("INJECT_TEST_IDENTITY"),
                defaults.inject_test_identity,
            )?,
            log_level: get("LOG_LEVEL").unwrap_or(defaults.log_level),
            log_format,
            cors_origins: get("CORS_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.cors_origins),
        })
    }

    /// Whether the service runs in the development environment
    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    /// Path of the Playground IDE
    pub fn playground_path(&self) -> String {
        format!("{}/playground", self.graphql_path)
    }

    /// Path of the GraphiQL IDE
    pub fn graphiql_path(&self) -> String {
        format!("{}/graphiql", self.graphql_path)
    }
}

fn invalid(key: &'static str, value: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.into(),
    }
}

fn parse_or<T: FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => v.trim().parse().map_err(|_| invalid(key, v)),
    }
}

fn bool_or(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match value {
        None => Ok(default),
        Some(v) => match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(invalid(key, v)),
        },
    }
}

fn validate_path(path: String) -> Result<String, ConfigError> {
    if path.len() < 2 || !path.starts_with('/') || path.ends_with('/') || path.contains(char::is_whitespace) {
        return Err(invalid("GRAPHQL_PATH", path));
    }
    Ok(path)
}
