use once_cell::sync::Lazy;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

use super::{
    models::{
        AuthConfig, CacheConfig, Config, ConfigMetadata, CorsConfig,
        ProviderConfig, ServerConfig, UpstreamConfig,
    },
    sources::{EnvConfig, FileConfig},
    validation::{self, ConfigGuardRailError, ConfigWarnings},
};

static DEFAULT_CONFIG_LOCATIONS: Lazy<Vec<PathBuf>> = Lazy::new(|| {
    vec![
        PathBuf::from("firetv.toml"),
        PathBuf::from("config/firetv.toml"),
    ]
});

#[derive(Debug, Default, Clone)]
pub struct ConfigLoaderOptions {
    pub config_path: Option<PathBuf>,
    pub env_file: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct ConfigLoader {
    options: ConfigLoaderOptions,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ConfigLoaderOptions) -> Self {
        Self { options }
    }

    pub fn with_config_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.config_path = Some(path.into());
        self
    }

    pub fn with_env_file<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.options.env_file = Some(path.into());
        self
    }

    /// `.env`, then the TOML file, then the process environment on top.
    pub fn load(&self) -> Result<ConfigLoad, ConfigLoadError> {
        let env_file_loaded = match &self.options.env_file {
            Some(path) => dotenvy::from_path(path).map(|_| true).or_else(
                |err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                },
            )?,
            None => {
                dotenvy::dotenv().map(|_| true).or_else(|err| match err {
                    dotenvy::Error::Io(_) => Ok(false),
                    _ => Err(err),
                })?
            }
        };

        let env_config = EnvConfig::gather();
        let (file_config, config_path) = self.load_file_config(&env_config)?;

        let (config, warnings) = compose_config(
            file_config,
            env_config,
            ConfigMetadata {
                config_path,
                env_file_loaded,
            },
        )?;

        Ok(ConfigLoad { config, warnings })
    }

    fn load_file_config(
        &self,
        env_config: &EnvConfig,
    ) -> Result<(Option<FileConfig>, Option<PathBuf>), ConfigLoadError> {
        let mut source = ConfigPathSource::default();

        if let Some(explicit) = &self.options.config_path {
            source.explicit = Some(explicit.clone());
        } else if let Some(from_env) = &env_config.config_path {
            source.env = Some(from_env.clone());
        }

        if source.is_empty() {
            source.default = DEFAULT_CONFIG_LOCATIONS
                .iter()
                .find(|candidate| candidate.exists())
                .cloned();
        }

        let Some((path, provenance)) = source.resolved_path() else {
            return Ok((None, None));
        };

        if !path.exists() {
            if provenance.is_explicit() {
                return Err(ConfigLoadError::MissingConfig { path });
            }
            return Ok((None, None));
        }

        let file_config = read_file_config(&path)?;
        Ok((Some(file_config), Some(path)))
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigLoadError> {
    let contents =
        fs::read_to_string(path).map_err(|err| ConfigLoadError::Io {
            path: path.to_path_buf(),
            source: err,
        })?;
    toml::from_str(&contents).map_err(|err| ConfigLoadError::Parse {
        path: path.to_path_buf(),
        source: err,
    })
}

/// Merge the sources: environment wins over the file, the file over the
/// built-in defaults.
pub fn compose_config(
    file_config: Option<FileConfig>,
    env: EnvConfig,
    metadata: ConfigMetadata,
) -> Result<(Config, ConfigWarnings), ConfigLoadError> {
    let mut warnings = ConfigWarnings::default();

    if metadata.config_path.is_none() {
        warnings.push_with_hint(
            "No firetv.toml detected; using environment variables and defaults",
            "Pass --config or set FIRETV_CONFIG to use a configuration file",
        );
    }

    let defaults = Config::default();
    let FileConfig {
        server: file_server,
        cors: file_cors,
        upstreams: file_upstreams,
        providers: file_providers,
        cache: file_cache,
        auth: file_auth,
        dev_mode: file_dev_mode,
    } = file_config.unwrap_or_default();

    let server = ServerConfig {
        host: env
            .server_host
            .or(file_server.host)
            .unwrap_or(defaults.server.host),
        port: env
            .server_port
            .or(file_server.port)
            .unwrap_or(defaults.server.port),
    };

    let cors = CorsConfig {
        allowed_origins: env
            .cors_allowed_origins
            .or(file_cors.allowed_origins)
            .unwrap_or(defaults.cors.allowed_origins),
    };

    let request_timeout = resolve_duration(
        "upstreams.request_timeout",
        env.upstream_timeout.or(file_upstreams.request_timeout),
        defaults.upstreams.request_timeout,
    )?;
    let upstreams = UpstreamConfig {
        python_backend_url: env
            .python_backend_url
            .or(file_upstreams.python_backend_url)
            .unwrap_or(defaults.upstreams.python_backend_url),
        recommender_url: env
            .recommender_url
            .or(file_upstreams.recommender_url)
            .unwrap_or(defaults.upstreams.recommender_url),
        request_timeout,
    };

    let provider_defaults = defaults.providers;
    let providers = ProviderConfig {
        watchmode_api_key: env
            .watchmode_api_key
            .or(file_providers.watchmode_api_key),
        omdb_api_key: env.omdb_api_key.or(file_providers.omdb_api_key),
        youtube_api_key: env.youtube_api_key.or(file_providers.youtube_api_key),
        watchmode_base_url: file_providers
            .watchmode_base_url
            .unwrap_or(provider_defaults.watchmode_base_url),
        tvmaze_base_url: file_providers
            .tvmaze_base_url
            .unwrap_or(provider_defaults.tvmaze_base_url),
        omdb_base_url: file_providers
            .omdb_base_url
            .unwrap_or(provider_defaults.omdb_base_url),
        youtube_base_url: file_providers
            .youtube_base_url
            .unwrap_or(provider_defaults.youtube_base_url),
    };

    let cache = CacheConfig {
        ttl: resolve_duration(
            "cache.ttl",
            env.cache_ttl.or(file_cache.ttl),
            defaults.cache.ttl,
        )?,
        max_entries: env
            .cache_max_entries
            .or(file_cache.max_entries)
            .unwrap_or(defaults.cache.max_entries),
        dir: env.cache_dir.or(file_cache.dir),
    };

    let auth = AuthConfig {
        token_secret: env
            .auth_token_secret
            .or(file_auth.token_secret)
            .unwrap_or(defaults.auth.token_secret),
    };

    let dev_mode = env.dev_mode.or(file_dev_mode).unwrap_or(defaults.dev_mode);

    let config = Config {
        server,
        cors,
        upstreams,
        providers,
        cache,
        auth,
        dev_mode,
        metadata,
    };

    let guard_warnings = validation::apply_guard_rails(&config)?;
    warnings.extend(guard_warnings);

    Ok((config, warnings))
}

fn resolve_duration(
    key: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigLoadError> {
    match raw {
        Some(value) => humantime::parse_duration(value.trim()).map_err(
            |source| ConfigLoadError::InvalidDuration { key, value, source },
        ),
        None => Ok(default),
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("configuration file not found at {path}")]
    MissingConfig { path: PathBuf },
    #[error("failed to read configuration file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse configuration file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("{key} is not a valid duration: {value:?}")]
    InvalidDuration {
        key: &'static str,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error(transparent)]
    GuardRail(#[from] ConfigGuardRailError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}

#[derive(Debug, Default)]
struct ConfigPathSource {
    explicit: Option<PathBuf>,
    env: Option<PathBuf>,
    default: Option<PathBuf>,
}

impl ConfigPathSource {
    fn is_empty(&self) -> bool {
        self.explicit.is_none() && self.env.is_none() && self.default.is_none()
    }

    fn resolved_path(&self) -> Option<(PathBuf, ConfigPathProvenance)> {
        if let Some(path) = &self.explicit {
            return Some((path.clone(), ConfigPathProvenance::Explicit));
        }
        if let Some(path) = &self.env {
            return Some((path.clone(), ConfigPathProvenance::Env));
        }
        if let Some(path) = &self.default {
            return Some((path.clone(), ConfigPathProvenance::Default));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigPathProvenance {
    Explicit,
    Env,
    Default,
}

impl ConfigPathProvenance {
    fn is_explicit(self) -> bool {
        matches!(
            self,
            ConfigPathProvenance::Explicit | ConfigPathProvenance::Env
        )
    }
}

#[derive(Debug)]
pub struct ConfigLoad {
    pub config: Config,
    pub warnings: ConfigWarnings,
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn empty_sources_yield_documented_defaults() {
        let (config, warnings) = compose_config(
            None,
            EnvConfig::default(),
            ConfigMetadata::default(),
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.upstreams.python_backend_url, "http://127.0.0.1:8000");
        assert_eq!(config.upstreams.request_timeout, Duration::from_secs(30));
        assert_eq!(config.cache.ttl, Duration::from_secs(86_400));
        assert_eq!(config.cache.max_entries, 100);
        assert!(config.cache.dir.is_none());
        assert!(!config.dev_mode);
        assert!(
            warnings
                .iter()
                .any(|w| w.message.starts_with("No firetv.toml"))
        );
    }

    #[test]
    fn environment_overrides_file() {
        let file = read_file_config(
            write_config(
                r#"
                [server]
                port = 5000
                host = "127.0.0.1"

                [cache]
                ttl = "2h"
                max_entries = 10
                "#,
            )
            .path(),
        )
        .unwrap();
        let env = EnvConfig {
            server_port: Some(6000),
            cache_ttl: Some("90s".into()),
            ..EnvConfig::default()
        };

        let (config, _) =
            compose_config(Some(file), env, ConfigMetadata::default()).unwrap();

        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.cache.ttl, Duration::from_secs(90));
        assert_eq!(config.cache.max_entries, 10);
    }

    #[test]
    fn malformed_duration_is_an_error() {
        let env = EnvConfig {
            upstream_timeout: Some("soon".into()),
            ..EnvConfig::default()
        };
        let err = compose_config(None, env, ConfigMetadata::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigLoadError::InvalidDuration {
                key: "upstreams.request_timeout",
                ..
            }
        ));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = ConfigLoader::new()
            .with_config_path("/definitely/not/here/firetv.toml")
            .with_env_file("/definitely/not/here/.env")
            .load()
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
    }

    #[test]
    fn unparseable_file_reports_its_path() {
        let file = write_config("server = [");
        let err = read_file_config(file.path()).unwrap_err();
        match err {
            ConfigLoadError::Parse { path, .. } => {
                assert_eq!(path, file.path())
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
