#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use firetv_server::{
    AppState, create_app,
    infra::{
        config::Config,
        startup::{NoopStartupHooks, StartupHooks},
    },
};
use tokio::net::TcpListener;

pub const TOKEN_SECRET: &str = "integration-test-secret";

/// Defaults with every upstream pointed at a closed local port so nothing
/// leaves the machine unless a test wires a stub in.
pub async fn test_config() -> Config {
    let closed = closed_port_url().await;
    let mut config = Config::default();
    config.auth.token_secret = TOKEN_SECRET.to_string();
    config.upstreams.python_backend_url = closed.clone();
    config.upstreams.recommender_url = closed.clone();
    config.providers.tvmaze_base_url = closed.clone();
    config.providers.youtube_base_url = closed.clone();
    config.providers.omdb_base_url = closed.clone();
    config.providers.watchmode_base_url = closed;
    config
}

pub async fn build_state(config: Config) -> AppState {
    let state = AppState::from_config(Arc::new(config))
        .await
        .expect("state builds from config");
    NoopStartupHooks.run(&state).await.expect("hooks run");
    state
}

pub async fn build_server(config: Config) -> (TestServer, AppState) {
    let state = build_state(config).await;
    let server = TestServer::new(create_app(state.clone())).expect("test server");
    (server, state)
}

/// Real HTTP transport, needed for WebSocket upgrades.
pub async fn build_http_server(config: Config) -> (TestServer, AppState) {
    let state = build_state(config).await;
    let server = TestServer::builder()
        .http_transport()
        .build(create_app(state.clone()))
        .expect("http test server");
    (server, state)
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// URL of a port that was just released, so connections are refused.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
