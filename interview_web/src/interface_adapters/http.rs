use crate::domain::{ApiTransport, NormalizedError, SessionStore, TOKEN_KEY, TransportFailure};
use crate::use_cases::classify::ErrorClassifier;
use async_trait::async_trait;
use futures::{StreamExt, stream};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Body, Client, Method, RequestBuilder, Response, multipart};
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use url::Url;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const UPLOAD_CHUNK_SIZE: usize = 16 * 1024;

pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

// Per-call overrides merged over the client defaults.
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    pub base_url: Option<String>,
    pub params: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

impl RequestConfig {
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

pub struct UploadFile {
    pub field: String,
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

// Multipart payload for uploads: plain text fields plus file parts.
#[derive(Default)]
pub struct UploadForm {
    pub fields: Vec<(String, String)>,
    pub files: Vec<UploadFile>,
}

impl UploadForm {
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn file(
        mut self,
        field: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.files.push(UploadFile {
            field: field.into(),
            file_name: file_name.into(),
            mime: None,
            bytes,
        });
        self
    }

    // Only file parts count toward progress; text fields are small and go out unmetered.
    // A form without file parts has an unknown total and never reports progress.
    fn total_bytes(&self) -> u64 {
        self.files.iter().map(|file| file.bytes.len() as u64).sum()
    }
}

// floor(loaded * 100 / total); None when the total size is unknown.
pub fn progress_percent(loaded: u64, total: u64) -> Option<u8> {
    if total == 0 {
        return None;
    }
    let percent = u128::from(loaded.min(total)) * 100 / u128::from(total);
    Some(percent as u8)
}

#[derive(Debug)]
pub enum ClientInitError {
    InvalidBaseUrl(url::ParseError),
    Build(reqwest::Error),
}

impl fmt::Display for ClientInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientInitError::InvalidBaseUrl(err) => write!(f, "invalid api base url: {err}"),
            ClientInitError::Build(err) => write!(f, "failed to build http client: {err}"),
        }
    }
}

impl std::error::Error for ClientInitError {}

// Request transport: thin wrapper around reqwest that attaches the session token
// and routes every failure through the error classifier.
#[derive(Clone)]
pub struct HttpClient {
    http: Client,
    base_url: String,
    timeout: Duration,
    download_dir: PathBuf,
    store: Arc<dyn SessionStore>,
    classifier: ErrorClassifier,
}

impl HttpClient {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        download_dir: impl Into<PathBuf>,
        store: Arc<dyn SessionStore>,
        classifier: ErrorClassifier,
    ) -> Result<Self, ClientInitError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(ClientInitError::InvalidBaseUrl)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(ClientInitError::Build)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            download_dir: download_dir.into(),
            store,
            classifier,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get(
        &self,
        path: &str,
        params: &[(&str, &str)],
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        let mut config = config;
        config.params.extend(
            params
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string())),
        );
        self.send(Method::GET, path, None, config).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Value,
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        self.send(Method::POST, path, Some(body), config).await
    }

    pub async fn put(
        &self,
        path: &str,
        body: Value,
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        self.send(Method::PUT, path, Some(body), config).await
    }

    pub async fn patch(
        &self,
        path: &str,
        body: Value,
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        self.send(Method::PATCH, path, Some(body), config).await
    }

    pub async fn delete(&self, path: &str, config: RequestConfig) -> Result<Value, NormalizedError> {
        self.send(Method::DELETE, path, None, config).await
    }

    #[tracing::instrument(name = "upload", skip_all, fields(path = %path))]
    pub async fn upload(
        &self,
        path: &str,
        form: UploadForm,
        on_progress: Option<ProgressCallback>,
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        let result = async {
            let builder = self.request(Method::POST, path, &config)?;
            let form = multipart_form(form, on_progress)?;
            let response = execute(builder.multipart(form)).await?;
            read_payload(response).await
        }
        .await;
        self.finish(result)
    }

    // Fetches a binary payload and saves it as `file_name` under the download directory.
    #[tracing::instrument(name = "download", skip_all, fields(path = %path, file_name = %file_name))]
    pub async fn download(
        &self,
        path: &str,
        file_name: &str,
        config: RequestConfig,
    ) -> Result<(), NormalizedError> {
        let result = async {
            let target = download_target(&self.download_dir, file_name)?;
            let builder = self.request(Method::GET, path, &config)?;
            let response = execute(builder).await?;
            let bytes = response
                .bytes()
                .await
                .map_err(|err| TransportFailure::NoResponse {
                    reason: err.to_string(),
                })?;
            save_file(&target, &bytes).await?;
            tracing::info!(file = %target.display(), size = bytes.len(), "download saved");
            Ok::<(), TransportFailure>(())
        }
        .await;
        self.finish(result)
    }

    #[tracing::instrument(name = "http_request", skip_all, fields(method = %method, path = %path))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        config: RequestConfig,
    ) -> Result<Value, NormalizedError> {
        let result = async {
            let builder = self.request(method, path, &config)?;
            let builder = match &body {
                Some(body) => builder.json(body),
                None => builder,
            };
            let response = execute(builder).await?;
            read_payload(response).await
        }
        .await;
        self.finish(result)
    }

    fn finish<T>(&self, result: Result<T, TransportFailure>) -> Result<T, NormalizedError> {
        result.map_err(|failure| self.classifier.handle(failure))
    }

    fn url_for(&self, path: &str, config: &RequestConfig) -> Result<Url, TransportFailure> {
        // Absolute URLs bypass the base URL.
        if let Ok(url) = Url::parse(path) {
            if url.has_host() {
                return Ok(url);
            }
        }
        let base_url = config.base_url.as_deref().unwrap_or(&self.base_url);
        let joined = format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&joined).map_err(|err| TransportFailure::Construction {
            message: Some(format!("invalid request url {joined}: {err}")),
        })
    }

    // Builds the request with defaults, overrides and the bearer token applied.
    fn request(
        &self,
        method: Method,
        path: &str,
        config: &RequestConfig,
    ) -> Result<RequestBuilder, TransportFailure> {
        let url = self.url_for(path, config)?;
        tracing::debug!(method = %method, url = %url, params = ?config.params, "request sent");

        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let name = HeaderName::from_bytes(name.as_bytes()).map_err(|err| {
                TransportFailure::Construction {
                    message: Some(format!("invalid header name {name}: {err}")),
                }
            })?;
            let value =
                HeaderValue::from_str(value).map_err(|err| TransportFailure::Construction {
                    message: Some(format!("invalid value for header {name}: {err}")),
                })?;
            headers.insert(name, value);
        }

        if let Some(token) = self.store.get(TOKEN_KEY) {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                TransportFailure::Construction {
                    message: Some("stored session token is not a valid header value".into()),
                }
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let mut builder = self
            .http
            .request(method, url)
            .headers(headers)
            .timeout(config.timeout.unwrap_or(self.timeout));
        if !config.params.is_empty() {
            builder = builder.query(&config.params);
        }
        Ok(builder)
    }
}

#[async_trait]
impl ApiTransport for HttpClient {
    async fn get_json(&self, path: &str) -> Result<Value, NormalizedError> {
        self.get(path, &[], RequestConfig::default()).await
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<Value, NormalizedError> {
        self.post(path, body, RequestConfig::default()).await
    }
}

fn map_send_error(err: reqwest::Error) -> TransportFailure {
    if err.is_builder() {
        return TransportFailure::Construction {
            message: Some(err.to_string()),
        };
    }
    // Connect failures, resets and timeouts all mean no response arrived.
    TransportFailure::NoResponse {
        reason: err.to_string(),
    }
}

async fn execute(builder: RequestBuilder) -> Result<Response, TransportFailure> {
    let response = builder.send().await.map_err(map_send_error)?;
    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "response received");

    // Keep the upstream status and body so the classifier can use the server message.
    if !status.is_success() {
        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<Value>(&bytes).ok());
        return Err(TransportFailure::ServerError {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

// Passes the body through as-is: JSON when it parses, text otherwise, null when empty.
async fn read_payload(response: Response) -> Result<Value, TransportFailure> {
    let bytes = response
        .bytes()
        .await
        .map_err(|err| TransportFailure::NoResponse {
            reason: err.to_string(),
        })?;
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned())))
}

fn multipart_form(
    form: UploadForm,
    on_progress: Option<ProgressCallback>,
) -> Result<multipart::Form, TransportFailure> {
    let total = form.total_bytes();
    let loaded = Arc::new(AtomicU64::new(0));
    let mut multipart = multipart::Form::new();

    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }

    for file in form.files {
        let length = file.bytes.len() as u64;
        let chunks: Vec<Vec<u8>> = file
            .bytes
            .chunks(UPLOAD_CHUNK_SIZE)
            .map(<[u8]>::to_vec)
            .collect();
        let loaded = Arc::clone(&loaded);
        let on_progress = on_progress.clone();

        // Progress is reported as chunks are pulled onto the wire.
        let chunks = stream::iter(chunks).map(move |chunk| {
            let sent = chunk.len() as u64;
            let so_far = loaded.fetch_add(sent, Ordering::SeqCst) + sent;
            if let (Some(callback), Some(percent)) = (&on_progress, progress_percent(so_far, total))
            {
                callback(percent);
            }
            Ok::<_, std::io::Error>(chunk)
        });

        let mut part = multipart::Part::stream_with_length(Body::wrap_stream(chunks), length)
            .file_name(file.file_name);
        if let Some(mime) = file.mime {
            part = part
                .mime_str(&mime)
                .map_err(|err| TransportFailure::Construction {
                    message: Some(err.to_string()),
                })?;
        }
        multipart = multipart.part(file.field, part);
    }

    Ok(multipart)
}

fn download_target(dir: &Path, file_name: &str) -> Result<PathBuf, TransportFailure> {
    let plain = !file_name.is_empty()
        && file_name != "."
        && file_name != ".."
        && !file_name.contains(['/', '\\']);
    if !plain {
        return Err(TransportFailure::Construction {
            message: Some(format!("invalid download file name {file_name:?}")),
        });
    }
    Ok(dir.join(file_name))
}

// Writes through a temporary sibling file so a failed save leaves nothing behind.
async fn save_file(target: &Path, bytes: &[u8]) -> Result<(), TransportFailure> {
    let to_failure = |err: std::io::Error| TransportFailure::Construction {
        message: Some(format!("failed to save {}: {err}", target.display())),
    };

    if let Some(dir) = target.parent() {
        tokio::fs::create_dir_all(dir).await.map_err(to_failure)?;
    }
    let mut temp = target.as_os_str().to_owned();
    temp.push(".part");
    let temp = PathBuf::from(temp);
    if let Err(err) = tokio::fs::write(&temp, bytes).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(to_failure(err));
    }
    if let Err(err) = tokio::fs::rename(&temp, target).await {
        let _ = tokio::fs::remove_file(&temp).await;
        return Err(to_failure(err));
    }
    Ok(())
}
