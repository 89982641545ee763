use axum::extract::DefaultBodyLimit;
use axum::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::api::ApiClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::handlers;
use crate::state::AppState;

/// Largest spreadsheet accepted by the import endpoint.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build the application state and Axum router from a [`Config`].
pub fn build_app(config: Config) -> AppResult<(AppState, Router)> {
    let api = ApiClient::new(config.api_config())?;
    tracing::info!(api_url = %api.base_url(), "Using procurement backend");

    let state = AppState::new(config, api);

    let app = Router::new()
        .merge(handlers::routes())
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state.clone());

    Ok((state, app))
}

/// Bind the router to `host:port` and spawn the server as a tokio task.
///
/// Returns the actual port the server bound to (useful when `port` is 0 for
/// OS-assigned ports) and a [`JoinHandle`] for the server task.
pub async fn serve(app: Router, host: &str, port: u16) -> AppResult<(u16, JoinHandle<()>)> {
    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr).await?;
    let actual_port = listener.local_addr()?.port();

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "Server error");
        }
    });

    Ok((actual_port, handle))
}
