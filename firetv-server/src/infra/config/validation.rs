use std::fmt;

use thiserror::Error;
use url::Url;

use super::models::Config;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub message: String,
    pub hint: Option<String>,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.hint {
            Some(hint) => write!(f, "{} ({})", self.message, hint),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigWarnings {
    items: Vec<ConfigWarning>,
}

impl ConfigWarnings {
    pub fn push(&mut self, message: impl Into<String>) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: None,
        });
    }

    pub fn push_with_hint(
        &mut self,
        message: impl Into<String>,
        hint: impl Into<String>,
    ) {
        self.items.push(ConfigWarning {
            message: message.into(),
            hint: Some(hint.into()),
        });
    }

    pub fn extend(&mut self, other: ConfigWarnings) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ConfigWarning> {
        self.items.iter()
    }
}

#[derive(Debug, Error)]
pub enum ConfigGuardRailError {
    #[error("{key} must be an absolute http(s) URL, got {value:?}")]
    InvalidUpstreamUrl { key: &'static str, value: String },
    #[error("cache.max_entries must be at least 1")]
    EmptyCache,
}

/// Hard failures for values the service cannot run with, warnings for ones
/// it can but probably should not.
pub fn apply_guard_rails(
    config: &Config,
) -> Result<ConfigWarnings, ConfigGuardRailError> {
    let mut warnings = ConfigWarnings::default();

    let upstreams = [
        (
            "upstreams.python_backend_url",
            &config.upstreams.python_backend_url,
        ),
        ("upstreams.recommender_url", &config.upstreams.recommender_url),
        (
            "providers.watchmode_base_url",
            &config.providers.watchmode_base_url,
        ),
        ("providers.tvmaze_base_url", &config.providers.tvmaze_base_url),
        ("providers.omdb_base_url", &config.providers.omdb_base_url),
        ("providers.youtube_base_url", &config.providers.youtube_base_url),
    ];
    for (key, value) in upstreams {
        if !is_http_url(value) {
            return Err(ConfigGuardRailError::InvalidUpstreamUrl {
                key,
                value: value.clone(),
            });
        }
    }

    if config.cache.max_entries == 0 {
        return Err(ConfigGuardRailError::EmptyCache);
    }

    if config.auth.is_default_token_secret() {
        warnings.push_with_hint(
            "AUTH_TOKEN_SECRET is not set; socket tokens are checked against the development secret",
            "Set AUTH_TOKEN_SECRET to the secret your identity provider signs with",
        );
    }

    if !config.dev_mode {
        if config.cors.is_wildcard_included() {
            warnings.push("CORS allows any origin outside dev mode");
        }
        for origin in &config.cors.allowed_origins {
            if origin.trim() != "*" && !is_http_url(origin) {
                warnings.push(format!("Ignoring malformed CORS origin {origin:?}"));
            }
        }
    }

    for (name, key) in [
        ("Watchmode", &config.providers.watchmode_api_key),
        ("OMDB", &config.providers.omdb_api_key),
        ("YouTube", &config.providers.youtube_api_key),
    ] {
        if key.is_none() {
            warnings.push(format!("{name} API key not configured; provider disabled"));
        }
    }

    Ok(warnings)
}

fn is_http_url(raw: &str) -> bool {
    Url::parse(raw.trim())
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
