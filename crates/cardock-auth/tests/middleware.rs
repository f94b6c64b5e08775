//! Route-guard behavior through a real axum router.

mod common;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    http::{Request, StatusCode, header},
    middleware,
    routing::get,
};
use cardock_auth::{
    Authorized, Authorizer, KeyStore, TokenVerifier, permissions, require_permission, test_keys,
};
use common::JwksServer;
use jsonwebtoken::Algorithm;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn list_cars(Authorized(claims): Authorized) -> Json<Value> {
    Json(json!({
        "success": true,
        "subject": claims.sub,
        "permissions": claims.permissions,
    }))
}

fn app(jwks_url: &str) -> Router {
    let keys = KeyStore::new(
        jwks_url,
        Algorithm::RS256,
        Duration::from_secs(2),
        Duration::from_secs(600),
    )
    .expect("key store");
    let verifier = TokenVerifier::new(Algorithm::RS256, test_keys::ISSUER, test_keys::AUDIENCE);
    let authorizer = Arc::new(Authorizer::new(verifier, keys));

    Router::new()
        .route("/cars", get(list_cars))
        .layer(middleware::from_fn_with_state(
            authorizer,
            |state, req, next| require_permission(state, req, next, permissions::CARS_READ),
        ))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

fn get_cars(token: Option<&str>) -> Request<Body> {
    let builder = Request::builder().uri("/cars");
    let builder = match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    };
    builder.body(Body::empty()).expect("request")
}

#[tokio::test]
async fn test_authorized_request_reaches_handler_with_claims() {
    let server = JwksServer::start(test_keys::jwks(vec![test_keys::primary_jwk()])).await;
    let app = app(&server.url);

    let token = test_keys::mint_token(
        test_keys::PRIMARY_PRIVATE_KEY_PEM,
        test_keys::PRIMARY_KID,
        &test_keys::standard_claims(&[permissions::CARS_READ]),
    );

    let response = app.oneshot(get_cars(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["subject"], json!("auth0|test-user"));
    assert_eq!(body["permissions"], json!([permissions::CARS_READ]));
}

#[tokio::test]
async fn test_missing_header_maps_to_401() {
    let server = JwksServer::start(test_keys::jwks(vec![test_keys::primary_jwk()])).await;
    let app = app(&server.url);

    let response = app.oneshot(get_cars(None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["code"], json!("missing_header"));
}

#[tokio::test]
async fn test_insufficient_permissions_map_to_403() {
    let server = JwksServer::start(test_keys::jwks(vec![test_keys::primary_jwk()])).await;
    let app = app(&server.url);

    // Valid token, but only document permissions.
    let token = test_keys::mint_token(
        test_keys::PRIMARY_PRIVATE_KEY_PEM,
        test_keys::PRIMARY_KID,
        &test_keys::standard_claims(&[permissions::DOCUMENTS_READ]),
    );

    let response = app.oneshot(get_cars(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let body = body_json(response).await;
    assert_eq!(body["code"], json!("insufficient_permissions"));
}

#[tokio::test]
async fn test_expired_token_maps_to_401() {
    let server = JwksServer::start(test_keys::jwks(vec![test_keys::primary_jwk()])).await;
    let app = app(&server.url);

    let mut claims = test_keys::standard_claims(&[permissions::CARS_READ]);
    claims["exp"] = json!(chrono::Utc::now().timestamp() - 60);
    let token = test_keys::mint_token(
        test_keys::PRIMARY_PRIVATE_KEY_PEM,
        test_keys::PRIMARY_KID,
        &claims,
    );

    let response = app.oneshot(get_cars(Some(&token))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await;
    assert_eq!(body["code"], json!("token_expired"));
}
