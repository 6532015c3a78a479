use serde::Deserialize;
use std::{env, fmt, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_APP_NAME: &str = "Interview System";

// Optional TOML overrides; env vars still win over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_base_url: Option<String>,
    timeout_ms: Option<u64>,
    app_name: Option<String>,
    download_dir: Option<PathBuf>,
    session_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub app_name: String,
    pub download_dir: PathBuf,
    pub session_file: PathBuf,
}

#[derive(Debug)]
pub enum ConfigError {
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read config file {}: {source}", path.display())
            }
            ConfigError::Parse(err) => write!(f, "invalid config file: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ClientConfig {
    // Reads `INTERVIEW_WEB_CONFIG` (if set) and then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("INTERVIEW_WEB_CONFIG") {
            Ok(path) => {
                let path = PathBuf::from(path);
                let text = std::fs::read_to_string(&path)
                    .map_err(|source| ConfigError::Read { path, source })?;
                Some(text)
            }
            Err(_) => None,
        };
        Self::from_sources(file.as_deref(), |key| env::var(key).ok())
    }

    pub fn from_sources(
        file: Option<&str>,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file: FileConfig = match file {
            Some(text) => toml::from_str(text).map_err(ConfigError::Parse)?,
            None => FileConfig::default(),
        };

        let api_base_url = env_var("API_BASE_URL")
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        let timeout_ms = env_var("API_TIMEOUT_MS")
            .and_then(|value| value.parse::<u64>().ok())
            .or(file.timeout_ms)
            .unwrap_or(DEFAULT_TIMEOUT_MS);
        let app_name = env_var("APP_NAME")
            .or(file.app_name)
            .unwrap_or_else(|| DEFAULT_APP_NAME.to_string());
        let download_dir = env_var("DOWNLOAD_DIR")
            .map(PathBuf::from)
            .or(file.download_dir)
            .unwrap_or_else(|| PathBuf::from("downloads"));
        let session_file = env_var("SESSION_FILE")
            .map(PathBuf::from)
            .or(file.session_file)
            .unwrap_or_else(|| PathBuf::from(".interview_web/session.json"));

        Ok(Self {
            api_base_url,
            timeout: Duration::from_millis(timeout_ms),
            app_name,
            download_dir,
            session_file,
        })
    }
}
