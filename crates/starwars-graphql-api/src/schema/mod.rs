//! # GraphQL Schema Module
//!
//! Complete GraphQL type system for the Star Wars API.

pub mod connection;
pub mod enums;
pub mod inputs;
pub mod objects;
pub mod scalars;

// Re-export all types
pub use connection::*;
pub use enums::*;
pub use inputs::*;
pub use objects::*;
pub use scalars::*;
