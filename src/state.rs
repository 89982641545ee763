use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::pagination::Paginator;
use crate::services::aggregation::AggregateOptions;

/// Shared handler state. The server keeps no per-user state: every request
/// carries its own years, search term and page.
#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
}

impl AppState {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config: Arc::new(config),
            api,
        }
    }

    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.config.page_size)
    }

    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions::with_top_n(self.config.top_n)
    }
}
