pub mod loader;
pub mod models;
pub mod sources;
pub mod validation;

pub use loader::{
    ConfigLoad, ConfigLoadError, ConfigLoader, ConfigLoaderOptions,
    compose_config,
};
pub use models::{
    AuthConfig, CacheConfig, Config, ConfigMetadata, CorsConfig,
    ProviderConfig, ServerConfig, UpstreamConfig,
};
pub use validation::{ConfigGuardRailError, ConfigWarning, ConfigWarnings};
