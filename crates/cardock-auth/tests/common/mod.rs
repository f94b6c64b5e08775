//! In-process JWKS endpoint for resolver and end-to-end tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde_json::Value;

#[derive(Clone)]
struct JwksState {
    document: Arc<RwLock<Value>>,
    fetches: Arc<AtomicUsize>,
    failing: Arc<AtomicBool>,
}

async fn serve_jwks(State(state): State<JwksState>) -> Response {
    state.fetches.fetch_add(1, Ordering::SeqCst);
    if state.failing.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }
    let document = state.document.read().expect("document lock").clone();
    Json(document).into_response()
}

/// Serves a swappable JWKS document on an ephemeral local port and counts
/// how often it gets fetched.
pub struct JwksServer {
    pub url: String,
    state: JwksState,
}

impl JwksServer {
    pub async fn start(document: Value) -> Self {
        cardock_observability::init_console_logging();

        let state = JwksState {
            document: Arc::new(RwLock::new(document)),
            fetches: Arc::new(AtomicUsize::new(0)),
            failing: Arc::new(AtomicBool::new(false)),
        };
        let app = Router::new()
            .route("/.well-known/jwks.json", get(serve_jwks))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind jwks listener");
        let addr = listener.local_addr().expect("jwks listener addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve jwks");
        });

        Self {
            url: format!("http://{addr}/.well-known/jwks.json"),
            state,
        }
    }

    /// Replace the served document, simulating key rotation at the issuer.
    pub fn set_document(&self, next: Value) {
        *self.state.document.write().expect("document lock") = next;
    }

    /// Make the endpoint answer 500 until turned off again.
    pub fn set_failing(&self, failing: bool) {
        self.state.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.state.fetches.load(Ordering::SeqCst)
    }
}
