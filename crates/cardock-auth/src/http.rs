//! HTTP boundary for [`AuthError`].
//!
//! The only transport-aware code in the crate: a pure status lookup plus the
//! JSON error body. The verification pipeline itself never touches HTTP
//! vocabulary.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::AuthError;

impl AuthError {
    /// HTTP status for this failure.
    ///
    /// Permission failures are `403` (the caller is authenticated but not
    /// entitled); everything else, including an unavailable key set, is
    /// `401`.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::NoPermissionsClaim | AuthError::InsufficientPermissions { .. } => {
                StatusCode::FORBIDDEN
            }
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        if self.is_operational() {
            // Not the caller's fault; make sure operators see it.
            tracing::error!(code = self.code(), error = %self, "authorization infrastructure failure");
        }

        let body = Json(json!({
            "success": false,
            "code": self.code(),
            "error": self.to_string(),
        }));

        (self.status_code(), body).into_response()
    }
}
