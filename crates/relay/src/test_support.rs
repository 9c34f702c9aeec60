//! Shared fixtures: an HTTP recorder standing in for webhook endpoints and a
//! scripted event source.

use std::{
    collections::VecDeque,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use {
    async_trait::async_trait,
    axum::{Router, body::Bytes, extract::State, http::StatusCode, http::Uri, routing::post},
    kyron_config::BrandingConfig,
    kyron_rewrite::{DEFAULT_RULES, Rewriter},
    kyron_routing::ChannelRouter,
    serde_json::Value,
    tokio::{sync::oneshot, task::JoinHandle},
};

use crate::{
    Error, Result,
    relay::RelayContext,
    session::{EventSource, SourceEvent},
};

pub fn context(routes: &[(u64, String)]) -> RelayContext {
    RelayContext {
        router: Arc::new(ChannelRouter::new(routes.iter().cloned()).expect("router")),
        rewriter: Arc::new(Rewriter::new(DEFAULT_RULES.iter().copied()).expect("rules")),
        branding: Arc::new(BrandingConfig::default()),
    }
}

// ── Webhook recorder ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub body: Value,
}

#[derive(Clone, Default)]
struct RecorderState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    statuses: Arc<Mutex<VecDeque<u16>>>,
}

/// Records POST bodies in arrival order and answers with scripted statuses
/// (200 once the script runs out).
pub struct Recorder {
    addr: SocketAddr,
    state: RecorderState,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<()>,
}

impl Recorder {
    pub async fn start(statuses: Vec<u16>) -> Self {
        let state = RecorderState {
            statuses: Arc::new(Mutex::new(statuses.into())),
            ..Default::default()
        };
        let app = Router::new()
            .route("/{*path}", post(record))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind recorder");
        let addr = listener.local_addr().expect("recorder addr");
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let server = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve recorder");
        });

        Self {
            addr,
            state,
            shutdown,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().expect("requests lock").clone()
    }

    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.server.await;
    }
}

async fn record(State(state): State<RecorderState>, uri: Uri, body: Bytes) -> StatusCode {
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
    state
        .requests
        .lock()
        .expect("requests lock")
        .push(RecordedRequest {
            path: uri.path().to_string(),
            body,
        });
    let status = state
        .statuses
        .lock()
        .expect("statuses lock")
        .pop_front()
        .unwrap_or(200);
    StatusCode::from_u16(status).unwrap_or(StatusCode::OK)
}

// ── Scripted event source ───────────────────────────────────────────────────

pub enum Step {
    Event(SourceEvent),
    Fail(&'static str),
}

pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Replays `steps`, then stays connected and silent.
///
/// Lifecycle calls and delivered messages are appended to the shared log as
/// `"{name}:connect"`, `"{name}:message:{content}"` and `"{name}:close"`.
pub struct ScriptedSource {
    name: &'static str,
    steps: VecDeque<Step>,
    fail_connect: bool,
    log: EventLog,
}

impl ScriptedSource {
    pub fn new(name: &'static str, steps: Vec<Step>) -> (Self, EventLog) {
        Self::with_log(name, steps, EventLog::default())
    }

    pub fn with_log(name: &'static str, steps: Vec<Step>, log: EventLog) -> (Self, EventLog) {
        let source = Self {
            name,
            steps: steps.into(),
            fail_connect: false,
            log: Arc::clone(&log),
        };
        (source, log)
    }

    pub fn failing_connect(name: &'static str) -> (Self, EventLog) {
        let (mut source, log) = Self::new(name, Vec::new());
        source.fail_connect = true;
        (source, log)
    }

    fn note(&self, entry: String) {
        self.log.lock().expect("log lock").push(entry);
    }
}

#[async_trait]
impl EventSource for ScriptedSource {
    async fn connect(&mut self) -> Result<()> {
        self.note(format!("{}:connect", self.name));
        if self.fail_connect {
            return Err(Error::disconnected("authentication failed"));
        }
        Ok(())
    }

    async fn next_event(&mut self) -> Result<SourceEvent> {
        match self.steps.pop_front() {
            Some(Step::Event(event)) => {
                if let SourceEvent::Message(message) = &event {
                    self.note(format!("{}:message:{}", self.name, message.content));
                }
                Ok(event)
            },
            Some(Step::Fail(reason)) => Err(Error::disconnected(reason)),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.note(format!("{}:close", self.name));
    }
}
