//! Axum integration: the route guard middleware and the claims extractor.

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::claims::ClaimSet;
use crate::error::AuthError;
use crate::guard::Authorizer;

/// Middleware that runs the full authorization pipeline before a protected
/// route, parameterized by the permission the route requires.
///
/// On success the verified [`ClaimSet`] is placed in the request extensions
/// for handlers to read via [`Authorized`].
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// use axum::{Router, middleware, routing::get};
/// use cardock_auth::{permissions, require_permission};
///
/// let cars = Router::new()
///     .route("/cars", get(list_cars))
///     .layer(middleware::from_fn_with_state(
///         authorizer.clone(),
///         |state, req, next| require_permission(state, req, next, permissions::CARS_READ),
///     ));
/// ```
pub async fn require_permission(
    State(authorizer): State<Arc<Authorizer>>,
    mut req: Request,
    next: Next,
    permission: &'static str,
) -> Result<Response, AuthError> {
    let header_value = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => match value.to_str() {
            Ok(value) => Some(value),
            Err(_) => return Err(AuthError::MalformedHeader),
        },
    };

    let claims = match authorizer.authorize(header_value, permission).await {
        Ok(claims) => claims,
        Err(err) => {
            warn!(code = err.code(), permission, "request denied");
            return Err(err);
        }
    };

    // Hand the verified claims to the handler.
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extractor handing a handler the claims verified by [`require_permission`].
///
/// The handler receives its own clone; mutating it has no effect on
/// authorization, which already completed.
#[derive(Debug, Clone)]
pub struct Authorized(pub ClaimSet);

impl<S> FromRequestParts<S> for Authorized
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Absent claims mean the route was never wrapped with
        // require_permission; deny rather than serve unauthenticated.
        parts
            .extensions
            .get::<ClaimSet>()
            .cloned()
            .map(Authorized)
            .ok_or(AuthError::MissingHeader)
    }
}
