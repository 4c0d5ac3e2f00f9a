use std::{path::PathBuf, time::Duration};

use firetv_core::{
    CachePolicy,
    chapters::DEFAULT_CHAPTER_SERVICE_URL,
    providers::{
        omdb::OMDB_API_BASE, tvmaze::TVMAZE_API_BASE,
        watchmode::WATCHMODE_API_BASE, youtube::YOUTUBE_API_BASE,
    },
};

/// Signing secret used when none is configured. Only fit for local work.
pub const DEFAULT_TOKEN_SECRET: &str = "firetv-dev-token-secret";
pub const DEFAULT_RECOMMENDER_URL: &str = "http://localhost:3001";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub upstreams: UpstreamConfig,
    pub providers: ProviderConfig,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
    pub dev_mode: bool,
    pub metadata: ConfigMetadata,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 4000,
            },
            cors: CorsConfig {
                allowed_origins: vec![DEFAULT_CORS_ORIGIN.to_string()],
            },
            upstreams: UpstreamConfig {
                python_backend_url: DEFAULT_CHAPTER_SERVICE_URL.to_string(),
                recommender_url: DEFAULT_RECOMMENDER_URL.to_string(),
                request_timeout: Duration::from_secs(30),
            },
            providers: ProviderConfig::default(),
            cache: CacheConfig {
                ttl: Duration::from_secs(24 * 60 * 60),
                max_entries: 100,
                dir: None,
            },
            auth: AuthConfig {
                token_secret: DEFAULT_TOKEN_SECRET.to_string(),
            },
            dev_mode: false,
            metadata: ConfigMetadata::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn is_wildcard_included(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == "*")
    }
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Chapter generation service.
    pub python_backend_url: String,
    /// Recommendation service feeding the roulette.
    pub recommender_url: String,
    pub request_timeout: Duration,
}

/// Third-party metadata APIs. A missing key disables the provider.
#[derive(Clone)]
pub struct ProviderConfig {
    pub watchmode_api_key: Option<String>,
    pub omdb_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub watchmode_base_url: String,
    pub tvmaze_base_url: String,
    pub omdb_base_url: String,
    pub youtube_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            watchmode_api_key: None,
            omdb_api_key: None,
            youtube_api_key: None,
            watchmode_base_url: WATCHMODE_API_BASE.to_string(),
            tvmaze_base_url: TVMAZE_API_BASE.to_string(),
            omdb_base_url: OMDB_API_BASE.to_string(),
            youtube_base_url: YOUTUBE_API_BASE.to_string(),
        }
    }
}

// Keys stay out of logs.
impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("watchmode", &self.watchmode_api_key.is_some())
            .field("omdb", &self.omdb_api_key.is_some())
            .field("youtube", &self.youtube_api_key.is_some())
            .field("watchmode_base_url", &self.watchmode_base_url)
            .field("tvmaze_base_url", &self.tvmaze_base_url)
            .field("omdb_base_url", &self.omdb_base_url)
            .field("youtube_base_url", &self.youtube_base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub ttl: Duration,
    pub max_entries: usize,
    /// Snapshot directory. `None` keeps the caches in memory only.
    pub dir: Option<PathBuf>,
}

impl CacheConfig {
    pub fn policy(&self) -> anyhow::Result<CachePolicy> {
        let ttl = chrono::TimeDelta::from_std(self.ttl)?;
        Ok(CachePolicy::new(ttl, self.max_entries))
    }
}

#[derive(Clone)]
pub struct AuthConfig {
    pub token_secret: String,
}

impl AuthConfig {
    pub fn is_default_token_secret(&self) -> bool {
        self.token_secret == DEFAULT_TOKEN_SECRET
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("default_secret", &self.is_default_token_secret())
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfigMetadata {
    pub config_path: Option<PathBuf>,
    pub env_file_loaded: bool,
}
