//! A canned-response panel HTTP server for transport tests.
//!
//! Serves the two real endpoint shapes — `/execute/{module}/{function}` for
//! the unified generation and `/json-api/cpanel` for the legacy one — from
//! an in-memory response table, and records every request (path, query, and
//! the headers the client is required to send) for assertions.
//!
//! The server binds an ephemeral loopback port and is torn down when the
//! [`MockPanel`] value is dropped.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::task::JoinHandle;

/// One request the mock panel received.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub user_agent: Option<String>,
}

type ResponseTable = HashMap<(String, String), (u16, String)>;

#[derive(Clone, Default)]
struct MockState {
    uapi: Arc<ResponseTable>,
    api2: Arc<ResponseTable>,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockState {
    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let header_str = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        };
        self.requests
            .lock()
            .expect("mock panel request log poisoned")
            .push(RecordedRequest {
                path: uri.path().to_owned(),
                query: uri.query().unwrap_or("").to_owned(),
                authorization: header_str(header::AUTHORIZATION),
                user_agent: header_str(header::USER_AGENT),
            });
    }
}

fn reply(entry: Option<&(u16, String)>) -> impl IntoResponse + use<> {
    let (status, body) = match entry {
        Some((status, body)) => (*status, body.clone()),
        None => (404, r#"{"error":"unknown operation"}"#.to_owned()),
    };
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
}

async fn uapi_handler(
    State(state): State<MockState>,
    Path((module, function)): Path<(String, String)>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(&uri, &headers);
    reply(state.uapi.get(&(module, function)))
}

async fn api2_handler(
    State(state): State<MockState>,
    uri: Uri,
    headers: HeaderMap,
) -> impl IntoResponse {
    state.record(&uri, &headers);
    let params: HashMap<String, String> =
        url::form_urlencoded::parse(uri.query().unwrap_or("").as_bytes())
            .into_owned()
            .collect();
    let key = (
        params
            .get("cpanel_jsonapi_module")
            .cloned()
            .unwrap_or_default(),
        params
            .get("cpanel_jsonapi_func")
            .cloned()
            .unwrap_or_default(),
    );
    reply(state.api2.get(&key))
}

/// Builder for a [`MockPanel`] response table.
#[derive(Default)]
pub struct MockPanelBuilder {
    uapi: ResponseTable,
    api2: ResponseTable,
}

impl MockPanelBuilder {
    /// Serve `body` with status 200 for a unified-generation operation.
    pub fn uapi(self, module: &str, function: &str, body: &str) -> Self {
        self.uapi_status(module, function, 200, body)
    }

    /// Serve `body` with an explicit status for a unified-generation operation.
    pub fn uapi_status(mut self, module: &str, function: &str, status: u16, body: &str) -> Self {
        self.uapi
            .insert((module.to_owned(), function.to_owned()), (status, body.to_owned()));
        self
    }

    /// Serve `body` with status 200 for a legacy-generation operation.
    pub fn api2(self, module: &str, function: &str, body: &str) -> Self {
        self.api2_status(module, function, 200, body)
    }

    /// Serve `body` with an explicit status for a legacy-generation operation.
    pub fn api2_status(mut self, module: &str, function: &str, status: u16, body: &str) -> Self {
        self.api2
            .insert((module.to_owned(), function.to_owned()), (status, body.to_owned()));
        self
    }

    /// Bind a loopback port and start serving.
    pub async fn start(self) -> MockPanel {
        let state = MockState {
            uapi: Arc::new(self.uapi),
            api2: Arc::new(self.api2),
            ..MockState::default()
        };

        let router = Router::new()
            .route("/execute/{module}/{function}", get(uapi_handler))
            .route("/json-api/cpanel", get(api2_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock panel listener");
        let addr = listener.local_addr().expect("mock panel has no local addr");

        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .await
                .expect("mock panel server failed");
        });

        MockPanel { addr, state, task }
    }
}

/// A running mock panel server.
pub struct MockPanel {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockPanel {
    pub fn builder() -> MockPanelBuilder {
        MockPanelBuilder::default()
    }

    /// Origin URL clients should be constructed with.
    pub fn origin(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Total number of requests received.
    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    /// Snapshot of all recorded requests, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("mock panel request log poisoned")
            .clone()
    }
}

impl Drop for MockPanel {
    fn drop(&mut self) {
        self.task.abort();
    }
}
