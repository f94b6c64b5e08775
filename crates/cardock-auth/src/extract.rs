//! `Authorization` header parsing.

use crate::error::AuthError;

/// Extract the bearer token from a raw `Authorization` header value.
///
/// The header must be exactly two space-separated parts, the first being the
/// literal `Bearer` (case-sensitive). The token itself is returned
/// unmodified; it is not decoded or inspected here.
///
/// # Errors
///
/// - [`AuthError::MissingHeader`] when the header is absent
/// - [`AuthError::MalformedHeader`] for any other shape
pub fn extract_bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingHeader)?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}
