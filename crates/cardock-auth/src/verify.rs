//! Token signature and claim validation.
//!
//! Checks run in a fixed order so every failure keeps its own kind:
//! structural header decode, declared algorithm, cryptographic signature,
//! payload decode, expiry, issuer, audience. Structural and cryptographic
//! failures are therefore always distinguishable from semantic claim
//! failures.

use chrono::Utc;
use jsonwebtoken::{Algorithm, Validation, decode, decode_header, errors::ErrorKind};

use crate::claims::ClaimSet;
use crate::error::AuthError;
use crate::keys::SigningKey;

/// Signing parameters declared by a token's protected header.
#[derive(Debug, Clone)]
pub struct TokenHeader {
    pub algorithm: Algorithm,
    pub key_id: String,
}

/// Validates tokens against this deployment's expected algorithm, issuer,
/// and audience. Pure computation; no I/O.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    algorithm: Algorithm,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn new(algorithm: Algorithm, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            algorithm,
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Decode the structural header to learn which key signed the token.
    ///
    /// This runs before any key resolution and does not verify anything.
    ///
    /// # Errors
    ///
    /// [`AuthError::MalformedToken`] when the token is not a decodable JWT or
    /// its header carries no `kid`.
    pub fn decode_header(&self, token: &str) -> Result<TokenHeader, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        let key_id = header.kid.ok_or(AuthError::MalformedToken)?;

        Ok(TokenHeader {
            algorithm: header.alg,
            key_id,
        })
    }

    /// Verify a token end to end against the given signing key and return
    /// its claims.
    ///
    /// # Errors
    ///
    /// Each check has its own failure kind; see [`AuthError`]. A token whose
    /// `exp` equals the current second is already expired, as is a token
    /// with no `exp` at all.
    pub fn verify(&self, token: &str, key: &SigningKey) -> Result<ClaimSet, AuthError> {
        let header = self.decode_header(token)?;
        if header.algorithm != self.algorithm {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        // Signature and structure only. Expiry and audience validation are
        // disabled here and re-checked individually below, so each claim
        // failure surfaces with its own kind instead of a catch-all.
        let mut validation = Validation::new(self.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let decoded =
            decode::<ClaimSet>(token, key.decoding_key(), &validation).map_err(|err| {
                match err.kind() {
                    ErrorKind::InvalidSignature | ErrorKind::Crypto(_) => {
                        AuthError::InvalidSignature
                    }
                    ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm,
                    _ => AuthError::MalformedToken,
                }
            })?;
        let claims = decoded.claims;

        let now = Utc::now().timestamp();
        match claims.exp {
            Some(exp) if exp > now => {}
            _ => return Err(AuthError::TokenExpired),
        }

        match &claims.iss {
            Some(issuer) if *issuer == self.issuer => {}
            _ => {
                return Err(AuthError::InvalidClaims {
                    reason: "issuer mismatch".to_string(),
                });
            }
        }

        match &claims.aud {
            Some(audience) if audience.contains(&self.audience) => {}
            _ => {
                return Err(AuthError::InvalidClaims {
                    reason: "audience mismatch".to_string(),
                });
            }
        }

        Ok(claims)
    }
}
