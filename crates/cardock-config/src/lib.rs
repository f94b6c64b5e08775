//! # Cardock Config
//!
//! Configuration types for Cardock services, loaded from environment
//! variables once at process start and immutable thereafter.
//!
//! - [`auth`]: identity provider and key-set configuration
//!
//! # Example
//!
//! ```ignore
//! use cardock_config::AuthConfig;
//!
//! let auth_config = AuthConfig::from_env();
//! ```

pub mod auth;

// Re-export commonly used types at crate root
pub use auth::AuthConfig;
