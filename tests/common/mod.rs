#![allow(dead_code)]

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode, Uri},
    response::Html,
    routing::{get, post},
    Router,
};
use once_cell::sync::Lazy;
use page_digest::{
    api::routes::create_router,
    config::Config,
    llm::LlmClient,
    telemetry::init_tracing,
    AppState,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const CANNED_ANSWER: &str = "A contract is a legally binding agreement.";
pub const CANNED_SUMMARY: &str = "# Example News\n\n- The launch was announced today.";

pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
  <head><title>Example News</title></head>
  <body>
    <nav>Home</nav>
    <h1>Launch announced</h1>
    <script>window.secret = "hidden";</script>
    <p>The launch was announced today.</p>
  </body>
</html>"#;

// Ensures that the `tracing` stack is only initialized once
static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        init_tracing("debug", std::io::stdout);
    }
});

/// How the fake upstream answers each route.
#[derive(Clone)]
pub struct Behavior {
    pub chat_status: StatusCode,
    pub chat_body: Value,
    pub embedding_status: StatusCode,
    pub embedding_body: Value,
    pub page_html: String,
}

impl Default for Behavior {
    fn default() -> Self {
        Behavior {
            chat_status: StatusCode::OK,
            chat_body: chat_reply(CANNED_SUMMARY),
            embedding_status: StatusCode::OK,
            embedding_body: json!({
                "object": "list",
                "data": [{ "object": "embedding", "index": 0, "embedding": [3.0, 4.0, 0.0] }]
            }),
            page_html: PAGE_HTML.to_string(),
        }
    }
}

pub fn chat_reply(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

/// Everything the fake upstream saw.
#[derive(Clone, Default)]
pub struct Recorded {
    pub chat_requests: Arc<Mutex<Vec<Value>>>,
    pub embedding_requests: Arc<Mutex<Vec<Value>>>,
    pub model_headers: Arc<Mutex<Vec<HeaderMap>>>,
    pub model_queries: Arc<Mutex<Vec<String>>>,
    pub page_user_agents: Arc<Mutex<Vec<String>>>,
    pub hits: Arc<AtomicUsize>,
}

impl Recorded {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn chat_requests(&self) -> Vec<Value> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn embedding_requests(&self) -> Vec<Value> {
        self.embedding_requests.lock().unwrap().clone()
    }

    fn record_model_call(&self, uri: &Uri, headers: HeaderMap) {
        self.hits.fetch_add(1, Ordering::SeqCst);
        self.model_headers.lock().unwrap().push(headers);
        self.model_queries
            .lock()
            .unwrap()
            .push(uri.query().unwrap_or_default().to_string());
    }
}

#[derive(Clone)]
struct UpstreamState {
    behavior: Behavior,
    recorded: Recorded,
}

/// A local stand-in for both the web page being summarized and the model endpoints.
pub struct FakeUpstream {
    pub base_url: String,
    pub recorded: Recorded,
}

impl FakeUpstream {
    pub fn page_url(&self) -> String {
        format!("{}/page", self.base_url)
    }

    pub fn config(&self) -> Config {
        self.config_with(&[])
    }

    pub fn config_with(&self, extra: &[(&str, &str)]) -> Config {
        let mut vars: Vec<(String, String)> = vec![
            ("OPENAI_API_AZURE_KEY".to_string(), "test-key".to_string()),
            ("AZURE_OPENAI_ENDPOINT".to_string(), self.base_url.clone()),
            ("PORT".to_string(), "0".to_string()),
        ];
        vars.extend(extra.iter().map(|(k, v)| (k.to_string(), v.to_string())));

        Config::from_lookup(|key| {
            vars.iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        })
        .expect("Failed to build test configuration")
    }

    pub fn llm_client(&self) -> LlmClient {
        LlmClient::new(self.config().llm).expect("Failed to build LLM client")
    }
}

pub async fn spawn_upstream(behavior: Behavior) -> FakeUpstream {
    Lazy::force(&TRACING);

    let recorded = Recorded::default();
    let state = UpstreamState {
        behavior,
        recorded: recorded.clone(),
    };

    let router = Router::new()
        .route("/page", get(page))
        .route("/chat/completions", post(chat))
        .route("/embeddings", post(embeddings))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind upstream");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    FakeUpstream {
        base_url: format!("http://{}", addr),
        recorded,
    }
}

async fn page(State(state): State<UpstreamState>, headers: HeaderMap) -> Html<String> {
    state.recorded.hits.fetch_add(1, Ordering::SeqCst);
    let user_agent = headers
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    state.recorded.page_user_agents.lock().unwrap().push(user_agent);
    Html(state.behavior.page_html.clone())
}

async fn chat(
    State(state): State<UpstreamState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.recorded.record_model_call(&uri, headers);
    state.recorded.chat_requests.lock().unwrap().push(body);
    (state.behavior.chat_status, Json(state.behavior.chat_body.clone()))
}

async fn embeddings(
    State(state): State<UpstreamState>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.recorded.record_model_call(&uri, headers);
    state.recorded.embedding_requests.lock().unwrap().push(body);
    (
        state.behavior.embedding_status,
        Json(state.behavior.embedding_body.clone()),
    )
}

pub struct TestApp {
    pub address: String,
}

/// Launches the summary server as a background task pointed at `upstream`.
pub async fn spawn_app(upstream: &FakeUpstream) -> TestApp {
    let app_state = AppState::new(&upstream.config()).expect("Failed to build app state");
    let router = create_router(app_state);

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind app");
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    TestApp {
        address: format!("http://{}", addr),
    }
}

/// Writes `contents` to a per-test persona file.
pub fn persona_file(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "page-digest-test-{}-{}.txt",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).expect("Failed to write persona file");
    path
}
