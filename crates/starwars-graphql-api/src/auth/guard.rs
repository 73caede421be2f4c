//! Field guard enforcing a named authorization policy.

use async_graphql::{Context, Guard, Result};

use super::claims::ClaimsPrincipal;
use super::policy::{AuthorizationOptions, AuthorizationResult};
use crate::error::{graphql_error, ApiError};

/// Guard that evaluates a named policy against the request's principal
///
/// The principal is read from request data; a request without one is
/// treated as anonymous.
pub struct PolicyGuard {
    policy: &'static str,
}

impl PolicyGuard {
    pub fn new(policy: &'static str) -> Self {
        Self { policy }
    }
}

impl Guard for PolicyGuard {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        let options = ctx.data::<AuthorizationOptions>()?;
        let anonymous = ClaimsPrincipal::anonymous();
        let principal = ctx.data_opt::<ClaimsPrincipal>().unwrap_or(&anonymous);

        match options.evaluate(self.policy, principal) {
            AuthorizationResult::Allowed => Ok(()),
            AuthorizationResult::NotAuthenticated => {
                tracing::debug!(policy = self.policy, "Rejected anonymous caller");
                Err(graphql_error(ApiError::NotAuthenticated))
            }
            AuthorizationResult::NotAllowed => {
                tracing::debug!(policy = self.policy, "Policy requirements not met");
                Err(graphql_error(ApiError::NotAuthorized {
                    policy: self.policy.to_string(),
                }))
            }
            AuthorizationResult::NoSuchPolicy => {
                tracing::error!(policy = self.policy, "Guard references unregistered policy");
                Err(graphql_error(ApiError::UnknownPolicy(
                    self.policy.to_string(),
                )))
            }
        }
    }
}
