//! Named authorization policies.
//!
//! A policy is a list of requirements evaluated against the caller's
//! [`ClaimsPrincipal`]. Every requirement must pass.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::claims::{ClaimTypes, ClaimsPrincipal};

/// Policy requiring the caller to carry a country claim
pub const HAS_COUNTRY: &str = "HasCountry";

type Assertion = Arc<dyn Fn(&ClaimsPrincipal) -> bool + Send + Sync>;

/// A single authorization requirement
#[derive(Clone)]
pub enum Requirement {
    /// Caller must have at least one authenticated identity
    AuthenticatedUser,
    /// Caller must carry a claim of the type; a non-empty list restricts values
    Claim {
        claim_type: String,
        allowed_values: Vec<String>,
    },
    /// Arbitrary predicate over the caller
    Assertion(Assertion),
}

impl Requirement {
    fn is_satisfied(&self, principal: &ClaimsPrincipal) -> bool {
        match self {
            Self::AuthenticatedUser => principal.is_authenticated(),
            Self::Claim {
                claim_type,
                allowed_values,
            } => principal.has_claim(|c| {
                c.claim_type == *claim_type
                    && (allowed_values.is_empty() || allowed_values.contains(&c.value))
            }),
            Self::Assertion(assertion) => assertion(principal),
        }
    }
}

impl fmt::Debug for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthenticatedUser => f.write_str("AuthenticatedUser"),
            Self::Claim {
                claim_type,
                allowed_values,
            } => f
                .debug_struct("Claim")
                .field("claim_type", claim_type)
                .field("allowed_values", allowed_values)
                .finish(),
            Self::Assertion(_) => f.write_str("Assertion(..)"),
        }
    }
}

/// A set of requirements
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    requirements: Vec<Requirement>,
}

impl AuthorizationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn require_authenticated_user(mut self) -> Self {
        self.requirements.push(Requirement::AuthenticatedUser);
        self
    }

    #[must_use]
    pub fn require_claim<I, S>(mut self, claim_type: impl Into<String>, allowed_values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requirements.push(Requirement::Claim {
            claim_type: claim_type.into(),
            allowed_values: allowed_values.into_iter().map(Into::into).collect(),
        });
        self
    }

    #[must_use]
    pub fn require_assertion<F>(mut self, assertion: F) -> Self
    where
        F: Fn(&ClaimsPrincipal) -> bool + Send + Sync + 'static,
    {
        self.requirements
            .push(Requirement::Assertion(Arc::new(assertion)));
        self
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    /// True when every requirement holds
    pub fn is_satisfied_by(&self, principal: &ClaimsPrincipal) -> bool {
        self.requirements.iter().all(|r| r.is_satisfied(principal))
    }
}

/// Outcome of evaluating a named policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationResult {
    Allowed,
    NotAuthenticated,
    NotAllowed,
    NoSuchPolicy,
}

/// Registry of named policies, shared through schema data
#[derive(Debug, Clone, Default)]
pub struct AuthorizationOptions {
    policies: HashMap<String, AuthorizationPolicy>,
}

impl AuthorizationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a named policy
    pub fn add_policy(&mut self, name: impl Into<String>, policy: AuthorizationPolicy) -> &mut Self {
        self.policies.insert(name.into(), policy);
        self
    }

    pub fn policy(&self, name: &str) -> Option<&AuthorizationPolicy> {
        self.policies.get(name)
    }

    /// Evaluate a named policy against the caller
    ///
    /// Requirements are only checked for an authenticated caller; claims on
    /// an unauthenticated identity never satisfy a policy.
    pub fn evaluate(&self, name: &str, principal: &ClaimsPrincipal) -> AuthorizationResult {
        let Some(policy) = self.policies.get(name) else {
            return AuthorizationResult::NoSuchPolicy;
        };

        if !principal.is_authenticated() {
            return AuthorizationResult::NotAuthenticated;
        }

        if policy.is_satisfied_by(principal) {
            AuthorizationResult::Allowed
        } else {
            AuthorizationResult::NotAllowed
        }
    }
}

/// Policies registered at startup
pub fn default_policies() -> AuthorizationOptions {
    let mut options = AuthorizationOptions::new();
    options.add_policy(
        HAS_COUNTRY,
        AuthorizationPolicy::new()
            .require_assertion(|user| user.has_claim(|c| c.claim_type == ClaimTypes::COUNTRY)),
    );
    options
}
