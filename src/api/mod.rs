pub mod backend;
pub mod client;

pub use client::{path_segment, ApiClient, ApiConfig, Download};
