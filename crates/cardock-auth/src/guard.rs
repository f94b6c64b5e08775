//! The authorization guard: one entry point composing the whole pipeline.

use std::time::Duration;

use jsonwebtoken::Algorithm;

use cardock_config::AuthConfig;

use crate::claims::ClaimSet;
use crate::error::AuthError;
use crate::extract::extract_bearer_token;
use crate::keys::KeyStore;
use crate::permissions::check_permission;
use crate::verify::TokenVerifier;

/// Verifies bearer tokens and enforces per-route permissions.
///
/// One `Authorizer` is built at startup and shared (behind an `Arc`) across
/// every in-flight request; [`authorize`](Self::authorize) holds no state of
/// its own, so concurrent calls only meet inside the [`KeyStore`] cache.
pub struct Authorizer {
    verifier: TokenVerifier,
    keys: KeyStore,
}

impl Authorizer {
    pub fn new(verifier: TokenVerifier, keys: KeyStore) -> Self {
        Self { verifier, keys }
    }

    /// Build an authorizer from environment-driven configuration.
    ///
    /// # Errors
    ///
    /// [`AuthError::UnsupportedAlgorithm`] when the configured algorithm name
    /// is not a known JWT algorithm; [`AuthError::KeySetUnavailable`] when
    /// the HTTP client cannot be constructed.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let algorithm: Algorithm = config
            .algorithm
            .parse()
            .map_err(|_| AuthError::UnsupportedAlgorithm)?;

        let keys = KeyStore::new(
            config.jwks_url.clone(),
            algorithm,
            Duration::from_secs(config.jwks_timeout_secs),
            Duration::from_secs(config.jwks_cache_ttl_secs),
        )?;
        let verifier =
            TokenVerifier::new(algorithm, config.issuer.as_str(), config.audience.as_str());

        Ok(Self::new(verifier, keys))
    }

    /// Authorize one request: extract the bearer token, resolve its signing
    /// key, verify signature and claims, and enforce the required
    /// permission.
    ///
    /// Short-circuits on the first failure; every failure is an
    /// [`AuthError`] variant. On success the returned [`ClaimSet`] is handed
    /// to the protected operation, which may read it but holds its own copy.
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required_permission: &str,
    ) -> Result<ClaimSet, AuthError> {
        let token = extract_bearer_token(header)?;
        let token_header = self.verifier.decode_header(token)?;
        let key = self.keys.resolve(&token_header.key_id).await?;
        let claims = self.verifier.verify(token, &key)?;
        check_permission(&claims, required_permission)?;

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig {
            issuer: "https://cardock.test/".to_string(),
            audience: "cardock-api".to_string(),
            algorithm: "RS256".to_string(),
            jwks_url: "https://cardock.test/.well-known/jwks.json".to_string(),
            jwks_timeout_secs: 10,
            jwks_cache_ttl_secs: 600,
        }
    }

    #[test]
    fn test_from_config_builds() {
        assert!(Authorizer::from_config(&config()).is_ok());
    }

    #[test]
    fn test_from_config_rejects_unknown_algorithm() {
        let mut config = config();
        config.algorithm = "none".to_string();
        assert!(matches!(
            Authorizer::from_config(&config),
            Err(AuthError::UnsupportedAlgorithm)
        ));
    }
}
