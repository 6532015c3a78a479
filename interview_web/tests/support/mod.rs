// Shared stub backend and client wiring for integration tests.
#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    routing::{get, post},
};
use interview_web::domain::{Browser, SessionStore, Toast, ToastSink};
use interview_web::interface_adapters::browser::InMemoryBrowser;
use interview_web::interface_adapters::storage::InMemorySessionStore;
use interview_web::{App, ClientConfig};
use serde_json::{Value, json};
use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex, OnceLock,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

pub const REPORT_BYTES: &[u8] = b"candidate,score\nalice,9\n";

static SERVER_URL: OnceLock<String> = OnceLock::new();
static SERVER_READY: OnceLock<()> = OnceLock::new();
static NEXT_HARNESS: AtomicUsize = AtomicUsize::new(0);

async fn interview(Path(id): Path<String>, headers: HeaderMap) -> Json<Value> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(json!({
        "code": 0,
        "message": "ok",
        "data": { "id": id },
        "auth": auth,
    }))
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = match code {
        400 => "pageSize must be positive",
        409 => "room already exists",
        _ => "upstream text",
    };
    (status, Json(json!({ "message": message })))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "late": true }))
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({ "echo": body }))
}

async fn upload(mut multipart: Multipart) -> Json<Value> {
    let mut received = 0usize;
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap_or_default();
        received += bytes.len();
        fields.push(name);
    }
    Json(json!({ "received": received, "fields": fields }))
}

fn stub_backend() -> Router {
    Router::new()
        .route("/api/interview/{id}", get(interview))
        .route("/status/{code}", get(status).post(status))
        .route("/slow", get(slow).post(slow))
        .route("/plain", get(|| async { "pong" }))
        .route("/empty", get(|| async { StatusCode::NO_CONTENT }))
        .route("/files/report.csv", get(|| async { REPORT_BYTES }))
        .route("/evaluation/add", post(echo))
        .route("/upload", post(upload))
}

// Ensure the stub backend is running and return its base URL.
pub fn ensure_server() -> &'static str {
    SERVER_READY.get_or_init(|| {
        let published_url = Arc::new(OnceLock::<String>::new());
        let published_url_thread = Arc::clone(&published_url);
        // Own runtime on an OS thread so the server outlives each `#[tokio::test]` runtime.
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("test runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("bind ephemeral test port");
                let addr = listener.local_addr().expect("get local addr");
                let _ = published_url_thread.set(format!("http://{}", addr));
                axum::serve(listener, stub_backend())
                    .await
                    .expect("stub backend failed");
            });
        });
        wait_for_server_url_and_readiness(published_url);
    });

    SERVER_URL
        .get()
        .expect("server url should be initialized")
        .as_str()
}

fn wait_for_server_url_and_readiness(published_url: Arc<OnceLock<String>>) {
    let base_url = loop {
        if let Some(url) = published_url.get() {
            break url.clone();
        }
        std::thread::sleep(Duration::from_millis(10));
    };
    let _ = SERVER_URL.set(base_url.clone());

    let addr = base_url
        .strip_prefix("http://")
        .expect("base url should use http://");
    for _ in 0..100 {
        if std::net::TcpStream::connect(addr).is_ok() {
            return;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    panic!("stub backend did not become ready in time");
}

// Base URL of a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind spare port");
    let addr = listener.local_addr().expect("spare port addr");
    drop(listener);
    format!("http://{addr}")
}

#[derive(Default)]
pub struct CollectingToasts {
    shown: Mutex<Vec<Toast>>,
}

impl CollectingToasts {
    pub fn shown(&self) -> Vec<Toast> {
        self.shown.lock().expect("toasts mutex poisoned").clone()
    }
}

impl ToastSink for CollectingToasts {
    fn show(&self, toast: Toast) {
        self.shown.lock().expect("toasts mutex poisoned").push(toast);
    }
}

pub struct Harness {
    pub store: Arc<InMemorySessionStore>,
    pub browser: Arc<InMemoryBrowser>,
    pub toasts: Arc<CollectingToasts>,
    pub download_dir: PathBuf,
    pub app: App,
}

impl Harness {
    pub fn login(&self, token: &str, username: &str) {
        interview_web::use_cases::session::remember_login(self.store.as_ref(), token, username);
    }
}

pub fn harness(base_url: &str, initial_path: &str) -> Harness {
    let download_dir = std::env::temp_dir().join(format!(
        "interview_web-downloads-{}-{}",
        std::process::id(),
        NEXT_HARNESS.fetch_add(1, Ordering::Relaxed)
    ));
    let config = ClientConfig {
        api_base_url: base_url.to_string(),
        timeout: Duration::from_secs(5),
        app_name: "Interview System".to_string(),
        download_dir: download_dir.clone(),
        session_file: PathBuf::from("unused.json"),
    };
    let store = Arc::new(InMemorySessionStore::default());
    let browser = Arc::new(InMemoryBrowser::new(initial_path));
    let toasts = Arc::new(CollectingToasts::default());

    let app = App::build(
        &config,
        Arc::clone(&store) as Arc<dyn SessionStore>,
        Arc::clone(&browser) as Arc<dyn Browser>,
        Some(Arc::clone(&toasts) as Arc<dyn ToastSink>),
    )
    .expect("app builds");

    Harness {
        store,
        browser,
        toasts,
        download_dir,
        app,
    }
}
