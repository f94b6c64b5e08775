//! Identity provider configuration.

use std::env;

/// Token verification settings.
///
/// Read once at startup; the guard never re-reads the environment.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://cardock.us.auth0.com/`.
    pub issuer: String,
    /// Expected `aud` claim.
    pub audience: String,
    /// Expected signing algorithm name, e.g. `RS256`.
    pub algorithm: String,
    /// JWKS endpoint; defaults to `<issuer>/.well-known/jwks.json`.
    pub jwks_url: String,
    /// Timeout for each key-set fetch, in seconds.
    pub jwks_timeout_secs: u64,
    /// How old the cached key set may grow before a resolve refreshes it,
    /// in seconds.
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn from_env() -> Self {
        let issuer = env::var("AUTH_ISSUER")
            .unwrap_or_else(|_| "https://cardock.us.auth0.com/".to_string());
        let jwks_url =
            env::var("AUTH_JWKS_URL").unwrap_or_else(|_| default_jwks_url(&issuer));

        Self {
            audience: env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "cardock".to_string()),
            algorithm: env::var("AUTH_ALGORITHM").unwrap_or_else(|_| "RS256".to_string()),
            jwks_timeout_secs: env::var("AUTH_JWKS_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            jwks_cache_ttl_secs: env::var("AUTH_JWKS_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600), // 10 minutes
            jwks_url,
            issuer,
        }
    }
}

fn default_jwks_url(issuer: &str) -> String {
    format!("{}/.well-known/jwks.json", issuer.trim_end_matches('/'))
}
