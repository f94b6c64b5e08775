//! Authorization failure taxonomy.
//!
//! Every way a request can fail verification is a distinct [`AuthError`]
//! variant with a stable machine-readable code, so callers and operators can
//! tell a forged or corrupt credential apart from a valid-but-ineligible one,
//! and both apart from the key source being down. Nothing in this module
//! knows about HTTP; the status mapping lives in [`crate::http`].

use thiserror::Error;

/// Why a request was denied.
///
/// All variants are terminal for the current request. The only internal
/// retry anywhere in the pipeline is the single key-set refresh performed by
/// [`crate::keys::KeyStore::resolve`] when a `kid` is not cached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("authorization header is missing")]
    MissingHeader,

    /// Header present but not of the form `Bearer <token>`.
    #[error("authorization header must be of the form `Bearer <token>`")]
    MalformedHeader,

    /// Token is not decodable as a three-segment signed JWT, or its header
    /// lacks the fields needed to select a verification key.
    #[error("access token is malformed")]
    MalformedToken,

    /// Token declares an algorithm other than the one this deployment
    /// verifies with.
    #[error("access token algorithm is not accepted")]
    UnsupportedAlgorithm,

    /// The token's `kid` is absent from the key set, even after a refresh.
    #[error("access token references an unknown signing key")]
    UnknownSigningKey,

    /// The remote key set could not be fetched or parsed. Operational
    /// failure, not a bad credential.
    #[error("signing key set is unavailable: {reason}")]
    KeySetUnavailable { reason: String },

    /// Cryptographic signature verification failed.
    #[error("access token signature is invalid")]
    InvalidSignature,

    /// The `exp` claim is missing or not in the future.
    #[error("access token has expired")]
    TokenExpired,

    /// Issuer or audience does not match this deployment.
    #[error("access token claims are invalid: {reason}")]
    InvalidClaims { reason: String },

    /// The token payload carries no `permissions` claim at all.
    #[error("access token carries no permissions")]
    NoPermissionsClaim,

    /// The `permissions` claim does not contain the required permission.
    #[error("access token does not grant `{required}`")]
    InsufficientPermissions { required: String },
}

impl AuthError {
    /// Stable machine-readable code for logs and error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "missing_header",
            AuthError::MalformedHeader => "malformed_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::UnknownSigningKey => "unknown_signing_key",
            AuthError::KeySetUnavailable { .. } => "key_set_unavailable",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidClaims { .. } => "invalid_claims",
            AuthError::NoPermissionsClaim => "no_permissions_claim",
            AuthError::InsufficientPermissions { .. } => "insufficient_permissions",
        }
    }

    /// Whether this failure points at the deployment rather than the caller's
    /// credential. Used to pick the log level at the boundary.
    pub fn is_operational(&self) -> bool {
        matches!(self, AuthError::KeySetUnavailable { .. })
    }
}
