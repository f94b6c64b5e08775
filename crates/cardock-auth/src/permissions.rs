//! Permission vocabulary and enforcement.
//!
//! Permissions are opaque strings granted to a credential by the identity
//! provider and matched exactly, case-sensitively, against what a route
//! requires. The constants below are the vocabulary of the Cardock API;
//! using them instead of string literals keeps routes and tests consistent.

use crate::claims::ClaimSet;
use crate::error::AuthError;

// =============================================================================
// Cars permissions
// =============================================================================

/// Permission to read cars
pub const CARS_READ: &str = "get:cars";
/// Permission to create cars
pub const CARS_CREATE: &str = "post:cars";
/// Permission to update cars
pub const CARS_UPDATE: &str = "patch:cars";
/// Permission to delete cars
pub const CARS_DELETE: &str = "delete:cars";

// =============================================================================
// Documents permissions
// =============================================================================

/// Permission to read documents
pub const DOCUMENTS_READ: &str = "get:documents";
/// Permission to create documents
pub const DOCUMENTS_CREATE: &str = "post:documents";
/// Permission to update documents
pub const DOCUMENTS_UPDATE: &str = "patch:documents";
/// Permission to delete documents
pub const DOCUMENTS_DELETE: &str = "delete:documents";

/// Check that a verified claim set grants the required permission.
///
/// # Errors
///
/// - [`AuthError::NoPermissionsClaim`] when the token has no `permissions`
///   claim at all; distinct from an empty list for diagnostics, though both
///   deny access
/// - [`AuthError::InsufficientPermissions`] when the claim is present but
///   does not contain the required string
pub fn check_permission(claims: &ClaimSet, required: &str) -> Result<(), AuthError> {
    let Some(permissions) = &claims.permissions else {
        return Err(AuthError::NoPermissionsClaim);
    };

    if permissions.iter().any(|granted| granted == required) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions {
            required: required.to_string(),
        })
    }
}
