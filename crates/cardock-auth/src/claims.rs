//! Decoded access-token claims.

use serde::{Deserialize, Serialize};

/// The `aud` claim, which providers emit either as a single string or as an
/// array of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    /// Whether this audience equals, or contains, the expected audience.
    pub fn contains(&self, expected: &str) -> bool {
        match self {
            Audience::One(audience) => audience == expected,
            Audience::Many(audiences) => audiences.iter().any(|a| a == expected),
        }
    }
}

/// Verified access-token payload.
///
/// A `ClaimSet` is only handed to callers by
/// [`TokenVerifier::verify`](crate::verify::TokenVerifier::verify) after
/// signature, algorithm, expiry, issuer, and audience have all passed, and it
/// is never persisted between requests. All fields are optional at the serde
/// level because validation, not deserialization, decides which absences are
/// fatal.
///
/// # Fields
///
/// - `iss`: Token issuer
/// - `sub`: Authenticated subject
/// - `aud`: Intended audience(s)
/// - `exp`: Expiry (Unix timestamp, seconds)
/// - `permissions`: Permission strings granted to the credential; `None` when
///   the provider emitted no `permissions` claim at all, which the
///   enforcement layer distinguishes from an empty list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimSet {
    #[serde(default)]
    pub iss: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub aud: Option<Audience>,
    #[serde(default)]
    pub exp: Option<i64>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

impl ClaimSet {
    /// Check whether the claim set grants a specific permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|permissions| permissions.iter().any(|p| p == permission))
    }
}
