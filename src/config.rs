use std::env;
use std::time::Duration;

use crate::api::ApiConfig;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_TOP_N: usize = 6;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    /// Number of categories kept after merging several years.
    pub top_n: usize,
    pub page_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 7080,
            api_url: DEFAULT_API_URL.into(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_retries: 0,
            top_n: DEFAULT_TOP_N,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Self {
            host: env::var("STARK_HOST").unwrap_or(defaults.host),
            port: parse_var("STARK_PORT").unwrap_or(defaults.port),
            api_url: env::var("STARK_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_url),
            request_timeout: parse_var("STARK_REQUEST_TIMEOUT_SECS")
                .filter(|secs: &u64| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            max_retries: parse_var("STARK_MAX_RETRIES").unwrap_or(defaults.max_retries),
            top_n: parse_var("STARK_TOP_N")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.top_n),
            page_size: parse_var("STARK_PAGE_SIZE")
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.api_url.clone(),
            timeout: self.request_timeout,
            max_retries: self.max_retries,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
