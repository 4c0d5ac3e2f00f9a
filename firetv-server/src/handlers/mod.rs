//! HTTP and WebSocket request handlers organized by feature

pub mod chapters;
pub mod content;
pub mod health;
pub mod parties;
pub mod roulette;
pub mod trailers;
pub mod watchlist;
pub mod websocket;
