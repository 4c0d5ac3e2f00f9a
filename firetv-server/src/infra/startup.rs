use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use crate::infra::app_state::AppState;

const SOCKET_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[async_trait]
pub trait StartupHooks: Send + Sync {
    async fn run(&self, state: &AppState) -> Result<()>;
}

/// Logs what the service came up with and starts the stale socket sweep.
#[derive(Debug, Default)]
pub struct ProdStartupHooks;

#[async_trait]
impl StartupHooks for ProdStartupHooks {
    async fn run(&self, state: &AppState) -> Result<()> {
        let trailer_cache = state.trailers.cache();
        info!(
            entries = trailer_cache.len(),
            max_entries = trailer_cache.policy().max_entries,
            "Trailer cache ready"
        );
        info!(
            chapters = state.chapters.base_url(),
            "Chapter relay target"
        );

        let manager = state.websocket_manager.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(SOCKET_SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                let removed = manager.prune_stale().await;
                if removed > 0 {
                    info!("Pruned {} stale socket connections", removed);
                } else {
                    debug!("Socket sweep found nothing stale");
                }
            }
        });

        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct NoopStartupHooks;

#[async_trait]
impl StartupHooks for NoopStartupHooks {
    async fn run(&self, _state: &AppState) -> Result<()> {
        Ok(())
    }
}
