pub mod api;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod money;
pub mod pagination;
pub mod server;
pub mod services;
pub mod state;
pub mod views;
pub mod years;

/// Application version from Cargo.toml (single source of truth)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
