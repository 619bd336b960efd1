//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::net::TcpListener;

pub const TOKEN: &str = "s.test-token";

/// One canned reply.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Reply {
    pub fn json(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A request the mock received.
#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub token: Option<String>,
}

struct MockState {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Reply>,
    seen: Mutex<Vec<Seen>>,
    hits: AtomicUsize,
}

/// A programmable Vault stand-in serving every path.
#[derive(Clone)]
pub struct MockVault {
    pub addr: SocketAddr,
    state: Arc<MockState>,
}

impl MockVault {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Queue replies served in order before the fallback.
    pub fn enqueue(&self, replies: impl IntoIterator<Item = Reply>) {
        self.state.replies.lock().unwrap().extend(replies);
    }

    /// Reply used once the queue is empty.
    pub fn set_fallback(&self, reply: Reply) {
        *self.state.fallback.lock().unwrap() = reply;
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.state.seen.lock().unwrap().clone()
    }
}

/// Start a mock Vault on an ephemeral port. Unqueued requests get `fallback`.
pub async fn start_mock_vault(fallback: Reply) -> MockVault {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let state = Arc::new(MockState {
        replies: Mutex::new(VecDeque::new()),
        fallback: Mutex::new(fallback),
        seen: Mutex::new(Vec::new()),
        hits: AtomicUsize::new(0),
    });

    let app = Router::new().fallback(handle).with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockVault { addr, state }
}

async fn handle(State(state): State<Arc<MockState>>, uri: Uri, headers: HeaderMap) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.seen.lock().unwrap().push(Seen {
        path: uri.path().to_string(),
        token: headers
            .get("x-vault-token")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    });

    let reply = {
        let next = state.replies.lock().unwrap().pop_front();
        next.unwrap_or_else(|| state.fallback.lock().unwrap().clone())
    };
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    (
        StatusCode::from_u16(reply.status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        reply.body,
    )
        .into_response()
}

/// An address nothing is listening on.
pub async fn closed_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// KV v2 response body wrapping `inner` as `data.data`.
pub fn kv_body(inner: serde_json::Value) -> String {
    serde_json::json!({
        "data": {
            "data": inner,
            "metadata": { "version": 1 }
        }
    })
    .to_string()
}
