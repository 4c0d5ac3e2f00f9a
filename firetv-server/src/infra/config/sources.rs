use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as defined in a TOML file.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FileConfig {
    #[serde(default)]
    pub server: FileServerConfig,
    #[serde(default)]
    pub cors: FileCorsConfig,
    #[serde(default)]
    pub upstreams: FileUpstreamConfig,
    #[serde(default)]
    pub providers: FileProviderConfig,
    #[serde(default)]
    pub cache: FileCacheConfig,
    #[serde(default)]
    pub auth: FileAuthConfig,
    pub dev_mode: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileServerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCorsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileUpstreamConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_backend_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommender_url: Option<String>,
    /// Humantime string, e.g. `"30s"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchmode_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchmode_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tvmaze_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omdb_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_base_url: Option<String>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileCacheConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct FileAuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_secret: Option<String>,
}

/// Environment-derived configuration values.
///
/// Durations are kept as raw strings here and parsed while composing so a
/// malformed value is reported instead of silently ignored.
#[derive(Debug, Default, Clone)]
pub struct EnvConfig {
    pub config_path: Option<PathBuf>,
    pub server_host: Option<String>,
    pub server_port: Option<u16>,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub python_backend_url: Option<String>,
    pub recommender_url: Option<String>,
    pub upstream_timeout: Option<String>,
    pub watchmode_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub cache_ttl: Option<String>,
    pub cache_max_entries: Option<usize>,
    pub cache_dir: Option<PathBuf>,
    pub auth_token_secret: Option<String>,
    pub dev_mode: Option<bool>,
}

impl EnvConfig {
    pub fn gather() -> Self {
        let mut env_config = Self::default();

        env_config.config_path =
            std::env::var("FIRETV_CONFIG").ok().map(PathBuf::from);
        env_config.server_host = std::env::var("SERVER_HOST").ok();
        env_config.server_port = std::env::var("SERVER_PORT")
            .ok()
            .and_then(|s| s.parse().ok());

        env_config.cors_allowed_origins = parse_csv_var("CORS_ALLOWED_ORIGINS");

        env_config.python_backend_url = non_empty_var("PYTHON_BACKEND_URL");
        env_config.recommender_url = non_empty_var("RECOMMENDER_URL");
        env_config.upstream_timeout = non_empty_var("UPSTREAM_TIMEOUT");

        env_config.watchmode_api_key = non_empty_var("WATCHMODE_API_KEY");
        env_config.omdb_api_key = non_empty_var("OMDB_API_KEY");
        env_config.youtube_api_key = non_empty_var("YOUTUBE_API_KEY");

        env_config.cache_ttl = non_empty_var("TRAILER_CACHE_TTL");
        env_config.cache_max_entries = std::env::var("TRAILER_CACHE_MAX_ENTRIES")
            .ok()
            .and_then(|s| s.trim().parse().ok());
        env_config.cache_dir = non_empty_var("CACHE_DIR").map(PathBuf::from);

        env_config.auth_token_secret = non_empty_var("AUTH_TOKEN_SECRET");
        env_config.dev_mode = parse_bool_var("DEV_MODE");

        env_config
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_csv_var(name: &str) -> Option<Vec<String>> {
    std::env::var(name).ok().map(|raw| split_csv(&raw))
}

pub(crate) fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .filter_map(|part| {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
        .collect()
}

fn parse_bool_var(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|raw| parse_bool(&raw))
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
