//! In-process HTTP fixture server
//!
//! Serves canned bodies for the catalog, checksum-listing and artifact
//! routes, records every request path, and answers 404 for anything it has
//! no fixture for.

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

#[derive(Clone)]
struct FixtureState {
    fixtures: Arc<HashMap<String, Vec<u8>>>,
    hits: Arc<Mutex<Vec<String>>>,
}

async fn serve_fixture(State(state): State<FixtureState>, uri: Uri) -> Response {
    let path = uri.path().to_string();
    log::debug!("fixture server hit: {}", path);
    state.hits.lock().unwrap().push(path.clone());

    match state.fixtures.get(&path) {
        Some(body) => (StatusCode::OK, body.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Vec::new()).into_response(),
    }
}

pub struct DistServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    hits: Arc<Mutex<Vec<String>>>,
}

impl DistServer {
    pub async fn start(fixtures: Vec<(String, Vec<u8>)>) -> Self {
        let state = FixtureState {
            fixtures: Arc::new(fixtures.into_iter().collect()),
            hits: Arc::new(Mutex::new(Vec::new())),
        };
        let hits = state.hits.clone();

        let app = Router::new().fallback(serve_fixture).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("failed to bind fixture server to 127.0.0.1:0: {}", e);
        });
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| {
                    log::error!("fixture server error: {}", e);
                });
        });

        DistServer {
            addr,
            shutdown_tx,
            hits,
        }
    }

    pub fn address(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Every request path seen so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
    }
}
