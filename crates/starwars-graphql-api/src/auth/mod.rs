//! # Authorization
//!
//! Claims-based identities, named policies, the GraphQL field guard that
//! enforces them, and the per-request hook that attaches an identity.

pub mod claims;
pub mod guard;
pub mod interceptor;
pub mod policy;

pub use claims::{Claim, ClaimTypes, ClaimsIdentity, ClaimsPrincipal};
pub use guard::PolicyGuard;
pub use interceptor::{
    interceptor_for, AnonymousIdentity, RequestInterceptor, SharedInterceptor, TestIdentity,
};
pub use policy::{
    default_policies, AuthorizationOptions, AuthorizationPolicy, AuthorizationResult,
    Requirement, HAS_COUNTRY,
};
