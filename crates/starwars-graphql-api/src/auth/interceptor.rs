//! Per-request identity hook.
//!
//! Runs once for every HTTP GraphQL request and once per WebSocket session,
//! before execution, and decides which [`ClaimsPrincipal`] the request
//! carries.

use std::sync::Arc;

use async_graphql::{Data, Request};
use axum::http::HeaderMap;

use super::claims::{Claim, ClaimTypes, ClaimsIdentity, ClaimsPrincipal};

/// Hook invoked while the GraphQL request is being created
pub trait RequestInterceptor: Send + Sync {
    /// Resolve the caller identity for a request with these headers
    fn principal(&self, headers: &HeaderMap) -> ClaimsPrincipal;

    /// Attach the resolved identity to an HTTP GraphQL request
    fn on_create_request(&self, headers: &HeaderMap, request: Request) -> Request {
        request.data(self.principal(headers))
    }

    /// Build the session data for a WebSocket connection
    fn on_create_session(&self, headers: &HeaderMap) -> Data {
        let mut data = Data::default();
        data.insert(self.principal(headers));
        data
    }
}

pub type SharedInterceptor = Arc<dyn RequestInterceptor>;

/// Leaves every caller anonymous
#[derive(Debug, Clone, Copy, Default)]
pub struct AnonymousIdentity;

impl RequestInterceptor for AnonymousIdentity {
    fn principal(&self, _headers: &HeaderMap) -> ClaimsPrincipal {
        ClaimsPrincipal::anonymous()
    }
}

/// Overwrites every caller with a fixed identity carrying `country = us`
///
/// A debugging aid for exercising policy-guarded fields without an
/// authentication scheme. Never enable it outside development.
#[derive(Debug, Clone)]
pub struct TestIdentity {
    principal: ClaimsPrincipal,
}

impl TestIdentity {
    pub const AUTHENTICATION_TYPE: &'static str = "abc";
    pub const COUNTRY: &'static str = "us";

    pub fn new() -> Self {
        let identity = ClaimsIdentity::new(Self::AUTHENTICATION_TYPE)
            .with_claim(Claim::new(ClaimTypes::COUNTRY, Self::COUNTRY));
        Self {
            principal: ClaimsPrincipal::new(identity),
        }
    }
}

impl Default for TestIdentity {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestInterceptor for TestIdentity {
    fn principal(&self, _headers: &HeaderMap) -> ClaimsPrincipal {
        self.principal.clone()
    }
}

/// Pick the interceptor for the configured mode
pub fn interceptor_for(inject_test_identity: bool) -> SharedInterceptor {
    if inject_test_identity {
        tracing::warn!(
            authentication_type = TestIdentity::AUTHENTICATION_TYPE,
            country = TestIdentity::COUNTRY,
            "Test identity injection enabled; every request is authenticated"
        );
        Arc::new(TestIdentity::new())
    } else {
        Arc::new(AnonymousIdentity)
    }
}
