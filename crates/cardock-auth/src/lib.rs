//! # Cardock Auth
//!
//! Bearer-token verification and permission enforcement for the Cardock API.
//!
//! Cardock routes are protected by access tokens signed by the identity
//! provider with RSA keys published as a JWK set. This crate owns the whole
//! verification pipeline:
//!
//! - [`extract`]: `Authorization: Bearer <token>` header parsing
//! - [`keys`]: fetching and caching the provider's signing keys
//! - [`verify`]: signature, algorithm, and claim validation
//! - [`permissions`]: permission strings and the permission check
//! - [`guard`]: [`Authorizer`], the single entry point composing the above
//! - [`middleware`]: the axum layer and claims extractor for protected routes
//! - [`error`] / [`http`]: the failure taxonomy and its HTTP mapping
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axum::{Router, middleware, routing::get};
//! use cardock_auth::{Authorized, Authorizer, permissions, require_permission};
//! use cardock_config::AuthConfig;
//!
//! let authorizer = Arc::new(Authorizer::from_config(&AuthConfig::from_env())?);
//!
//! async fn list_cars(Authorized(claims): Authorized) -> &'static str {
//!     "authorized"
//! }
//!
//! let app = Router::new().route("/cars", get(list_cars)).layer(
//!     middleware::from_fn_with_state(authorizer.clone(), |state, req, next| {
//!         require_permission(state, req, next, permissions::CARS_READ)
//!     }),
//! );
//! ```

pub mod claims;
pub mod error;
pub mod extract;
pub mod guard;
pub mod http;
pub mod keys;
pub mod middleware;
pub mod permissions;
pub mod verify;

#[cfg(any(test, feature = "test-keys"))]
pub mod test_keys;

// Re-export commonly used types at crate root
pub use claims::{Audience, ClaimSet};
pub use error::AuthError;
pub use extract::extract_bearer_token;
pub use guard::Authorizer;
pub use keys::{KeyStore, SigningKey};
pub use middleware::{Authorized, require_permission};
pub use permissions::check_permission;
pub use verify::{TokenHeader, TokenVerifier};
