//! Signing-key resolution against the issuer's published JWK set.
//!
//! The [`KeyStore`] owns the only shared mutable state in the crate: a
//! process-wide cache of verification keys, keyed by `kid`. Refreshes build a
//! complete replacement set and publish it with a single `Arc` swap, so
//! concurrent readers always see either the fully-old or the fully-new set.
//! Concurrent cache misses coalesce into one outstanding fetch.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use jsonwebtoken::{Algorithm, DecodingKey};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::AuthError;

/// A public verification key from the issuer's key set.
#[derive(Clone)]
pub struct SigningKey {
    pub kid: String,
    pub algorithm: Algorithm,
    decoding_key: DecodingKey,
}

impl SigningKey {
    pub fn new(kid: impl Into<String>, algorithm: Algorithm, decoding_key: DecodingKey) -> Self {
        Self {
            kid: kid.into(),
            algorithm,
            decoding_key,
        }
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // DecodingKey has no Debug impl and the material is not interesting.
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct JwkSetDocument {
    keys: Vec<JwkDocument>,
}

#[derive(Debug, Deserialize)]
struct JwkDocument {
    kty: String,
    #[serde(default)]
    kid: Option<String>,
    #[serde(default)]
    alg: Option<String>,
    #[serde(default, rename = "use")]
    key_use: Option<String>,
    #[serde(default)]
    n: Option<String>,
    #[serde(default)]
    e: Option<String>,
}

/// One immutable published generation of the key set.
struct CachedKeySet {
    generation: u64,
    fetched_at: Instant,
    keys: HashMap<String, SigningKey>,
}

/// Fetches, caches, and looks up the issuer's signing keys.
pub struct KeyStore {
    jwks_url: String,
    default_algorithm: Algorithm,
    cache_ttl: Duration,
    http: reqwest::Client,
    cached: RwLock<Option<Arc<CachedKeySet>>>,
    // Serializes refreshes so a burst of concurrent misses costs one fetch.
    refresh: Mutex<()>,
}

impl KeyStore {
    /// Create a store for the given JWKS endpoint.
    ///
    /// `default_algorithm` is assigned to JWK entries that omit `alg`.
    /// `fetch_timeout` bounds every network fetch; `cache_ttl` is how old a
    /// cached set may grow before the next resolve refreshes it.
    pub fn new(
        jwks_url: impl Into<String>,
        default_algorithm: Algorithm,
        fetch_timeout: Duration,
        cache_ttl: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder()
            .timeout(fetch_timeout)
            .build()
            .map_err(|err| AuthError::KeySetUnavailable {
                reason: format!("http client: {err}"),
            })?;

        Ok(Self {
            jwks_url: jwks_url.into(),
            default_algorithm,
            cache_ttl,
            http,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        })
    }

    /// Resolve a token's `kid` to a verification key.
    ///
    /// Serves from the cache when possible. On a miss (or a stale cache)
    /// performs at most one refresh-and-retry, which handles key rotation
    /// without every request paying network cost.
    ///
    /// # Errors
    ///
    /// - [`AuthError::UnknownSigningKey`] when the `kid` is absent even from
    ///   a freshly refreshed set
    /// - [`AuthError::KeySetUnavailable`] when the endpoint cannot be
    ///   fetched or parsed and no cached key can answer instead
    pub async fn resolve(&self, kid: &str) -> Result<SigningKey, AuthError> {
        let before = self.snapshot();
        if let Some(cached) = &before {
            if cached.fetched_at.elapsed() < self.cache_ttl {
                if let Some(key) = cached.keys.get(kid) {
                    debug!(kid, "signing key served from cache");
                    return Ok(key.clone());
                }
            }
        }

        let _refresh = self.refresh.lock().await;

        // Another request may have refreshed the set while this one waited
        // on the lock; that refresh counts as this call's one retry.
        let current = self.snapshot();
        let refreshed_while_waiting = match (&before, &current) {
            (Some(before), Some(current)) => current.generation > before.generation,
            (None, Some(_)) => true,
            _ => false,
        };
        if refreshed_while_waiting {
            if let Some(cached) = &current {
                if let Some(key) = cached.keys.get(kid) {
                    return Ok(key.clone());
                }
                if cached.fetched_at.elapsed() < self.cache_ttl {
                    return Err(AuthError::UnknownSigningKey);
                }
            }
        }

        let next_generation = current.as_ref().map(|c| c.generation + 1).unwrap_or(1);
        match self.fetch_key_set(next_generation).await {
            Ok(fetched) => {
                let key = fetched.keys.get(kid).cloned();
                self.publish(fetched);
                key.ok_or(AuthError::UnknownSigningKey)
            }
            Err(err) => {
                // A failed TTL refresh must not take down traffic that a
                // stale key can still verify; only a cold cache is fatal.
                if let Some(cached) = &current {
                    if let Some(key) = cached.keys.get(kid) {
                        warn!(kid, error = %err, "key set refresh failed, serving stale key");
                        return Ok(key.clone());
                    }
                }
                Err(err)
            }
        }
    }

    async fn fetch_key_set(&self, generation: u64) -> Result<Arc<CachedKeySet>, AuthError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|err| AuthError::KeySetUnavailable {
                reason: err.to_string(),
            })?
            .error_for_status()
            .map_err(|err| AuthError::KeySetUnavailable {
                reason: err.to_string(),
            })?;

        let document: JwkSetDocument =
            response
                .json()
                .await
                .map_err(|err| AuthError::KeySetUnavailable {
                    reason: format!("invalid key set document: {err}"),
                })?;

        let keys = collect_keys(document, self.default_algorithm);
        debug!(generation, count = keys.len(), "signing key set refreshed");

        Ok(Arc::new(CachedKeySet {
            generation,
            fetched_at: Instant::now(),
            keys,
        }))
    }

    fn snapshot(&self) -> Option<Arc<CachedKeySet>> {
        match self.cached.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn publish(&self, next: Arc<CachedKeySet>) {
        let mut guard = match self.cached.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(next);
    }
}

/// Build the `kid` lookup table from a parsed JWKS document.
///
/// Only RSA signature keys with usable material are loaded; anything else is
/// skipped rather than failing the whole set, since providers commonly
/// publish encryption or EC keys alongside the signing keys.
fn collect_keys(
    document: JwkSetDocument,
    default_algorithm: Algorithm,
) -> HashMap<String, SigningKey> {
    let mut keys = HashMap::new();

    for jwk in document.keys {
        let Some(kid) = jwk.kid else {
            debug!("skipping JWK without a kid");
            continue;
        };
        if jwk.kty != "RSA" {
            debug!(kid = %kid, kty = %jwk.kty, "skipping non-RSA JWK");
            continue;
        }
        if jwk.key_use.as_deref().is_some_and(|key_use| key_use != "sig") {
            debug!(kid = %kid, "skipping non-signature JWK");
            continue;
        }
        let (Some(n), Some(e)) = (&jwk.n, &jwk.e) else {
            debug!(kid = %kid, "skipping RSA JWK without modulus/exponent");
            continue;
        };

        let decoding_key = match DecodingKey::from_rsa_components(n, e) {
            Ok(key) => key,
            Err(err) => {
                warn!(kid = %kid, error = %err, "skipping JWK with unusable RSA components");
                continue;
            }
        };
        let algorithm = jwk
            .alg
            .as_deref()
            .and_then(|alg| alg.parse().ok())
            .unwrap_or(default_algorithm);

        keys.insert(kid.clone(), SigningKey::new(kid, algorithm, decoding_key));
    }

    keys
}
