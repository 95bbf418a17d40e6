use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use axum_extra::{
    headers::{authorization::Basic, Authorization},
    TypedHeader,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex, RwLock,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub mod prelude {
    pub use crate::{MockWhisk, RecordedInvocation};
    pub use axum::http::StatusCode;
}

/// One request as seen by the mock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedInvocation {
    pub action: String,
    pub blocking: bool,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// In-process stand-in for the action invocation API.
///
/// Answers `POST /api/v1/namespaces/_/actions/*action` with `200` unless told otherwise and
/// records every request it sees.
#[derive(Clone, Default)]
pub struct MockWhisk {
    state: Arc<MockState>,
}

#[derive(Default)]
struct MockState {
    statuses: RwLock<HashMap<String, StatusCode>>,
    delay: RwLock<Option<Duration>>,
    invocations: Mutex<Vec<RecordedInvocation>>,
    activations: AtomicU64,
}

#[derive(Debug, Deserialize)]
struct InvokeQuery {
    blocking: Option<String>,
}

impl MockWhisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer invocations of `action` with `status` from now on.
    pub fn respond_with(&self, action: &str, status: StatusCode) -> &Self {
        self.state
            .statuses
            .write()
            .unwrap()
            .insert(action.to_string(), status);
        self
    }

    /// Hold every response for `delay` before answering.
    pub fn delay(&self, delay: Duration) -> &Self {
        *self.state.delay.write().unwrap() = Some(delay);
        self
    }

    pub fn invocations(&self) -> Vec<RecordedInvocation> {
        self.state.invocations.lock().unwrap().clone()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/api/v1/namespaces/_/actions/*action", post(invoke))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        axum::serve(listener, self.router()).await
    }

    /// Bind to `addr` (port `0` picks a free one) and serve in the background.
    pub async fn spawn(&self, addr: SocketAddr) -> anyhow::Result<SocketAddr> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let mock = self.clone();
        tokio::spawn(async move {
            if let Err(err) = mock.serve(listener).await {
                tracing::error!("Mock service stopped: {err}");
            }
        });
        Ok(local_addr)
    }
}

async fn invoke(
    State(state): State<Arc<MockState>>,
    Path(action): Path<String>,
    Query(query): Query<InvokeQuery>,
    auth: Option<TypedHeader<Authorization<Basic>>>,
) -> (StatusCode, Json<Value>) {
    let (username, password) = match auth {
        Some(TypedHeader(basic)) => (
            Some(basic.username().to_string()),
            Some(basic.password().to_string()),
        ),
        None => (None, None),
    };

    state.invocations.lock().unwrap().push(RecordedInvocation {
        action: action.clone(),
        blocking: query.blocking.as_deref() == Some("true"),
        username,
        password,
    });

    let delay = *state.delay.read().unwrap();
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let status = state
        .statuses
        .read()
        .unwrap()
        .get(&action)
        .copied()
        .unwrap_or(StatusCode::OK);
    let activation = state.activations.fetch_add(1, Ordering::Relaxed);
    debug!("Invoked {action} -> {status}");

    let body = json!({
        "activationId": format!("{activation:032x}"),
        "name": action,
        "response": {
            "status": if status.is_success() { "success" } else { "application error" },
            "success": status.is_success(),
            "result": {},
        },
    });
    (status, Json(body))
}
