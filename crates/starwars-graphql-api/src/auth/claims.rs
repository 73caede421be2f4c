//! Claims-based caller identity.

/// Well-known claim type URIs
pub struct ClaimTypes;

impl ClaimTypes {
    pub const COUNTRY: &'static str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/country";
    pub const NAME: &'static str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
    pub const ROLE: &'static str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";
}

/// A single named attribute about the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claim {
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }
}

/// One identity of the caller, as issued by one authentication scheme
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsIdentity {
    pub authentication_type: Option<String>,
    pub claims: Vec<Claim>,
}

impl ClaimsIdentity {
    /// Create an authenticated identity
    pub fn new(authentication_type: impl Into<String>) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_claim(mut self, claim: Claim) -> Self {
        self.claims.push(claim);
        self
    }

    pub fn add_claim(&mut self, claim: Claim) {
        self.claims.push(claim);
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication_type.is_some()
    }
}

/// The caller: zero or more identities
///
/// Attached to every GraphQL request as request data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsPrincipal {
    pub identities: Vec<ClaimsIdentity>,
}

impl ClaimsPrincipal {
    pub fn new(identity: ClaimsIdentity) -> Self {
        Self {
            identities: vec![identity],
        }
    }

    /// A principal carrying no identity
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// True when any identity was authenticated
    pub fn is_authenticated(&self) -> bool {
        self.identities.iter().any(ClaimsIdentity::is_authenticated)
    }

    /// All claims across all identities
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.identities.iter().flat_map(|i| i.claims.iter())
    }

    pub fn has_claim<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Claim) -> bool,
    {
        self.claims().any(predicate)
    }

    /// First claim of the given type
    pub fn find_first(&self, claim_type: &str) -> Option<&Claim> {
        self.claims().find(|c| c.claim_type == claim_type)
    }
}
