use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Delay before the first retry; later retries wait proportionally longer.
const RETRY_DELAY_MS: u64 = 250;

/// Connection settings for the procurement backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Extra attempts after a transport failure. Non-2xx responses are never
    /// retried.
    pub max_retries: u32,
}

/// Thin wrapper over `reqwest` that resolves endpoints against the backend
/// base URL and maps failures onto [`AppError`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    max_retries: u32,
}

/// Raw response body together with its content type.
#[derive(Debug, Clone)]
pub struct Download {
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_retries: config.max_retries,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through unchanged; anything else is joined to the
    /// base URL with exactly one slash.
    pub fn resolve(&self, endpoint: &str) -> String {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            return endpoint.to_string();
        }
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> AppResult<T> {
        let url = self.resolve(endpoint);
        let response = self.send(endpoint, |http| http.get(&url)).await?;
        decode_json(endpoint, response).await
    }

    pub async fn get_json_query<T, Q>(&self, endpoint: &str, query: &Q) -> AppResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.resolve(endpoint);
        let response = self
            .send(endpoint, |http| http.get(&url).query(query))
            .await?;
        decode_json(endpoint, response).await
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> AppResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.resolve(endpoint);
        let response = self
            .send(endpoint, |http| http.post(&url).json(body))
            .await?;
        decode_json(endpoint, response).await
    }

    pub async fn get_bytes<Q>(&self, endpoint: &str, query: &Q) -> AppResult<Download>
    where
        Q: Serialize + ?Sized,
    {
        let url = self.resolve(endpoint);
        let response = self
            .send(endpoint, |http| http.get(&url).query(query))
            .await?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|source| AppError::Upstream {
            endpoint: endpoint.to_string(),
            source,
        })?;

        Ok(Download {
            content_type,
            bytes: bytes.to_vec(),
        })
    }

    /// Upload a single file as the `file` field of a multipart form. Uploads
    /// are not retried.
    pub async fn post_file<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> AppResult<T> {
        let url = self.resolve(endpoint);
        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new().part("file", part);

        debug!(endpoint = %endpoint, file_name = %file_name, "Uploading file to backend");

        let response = self
            .http
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|source| AppError::Upstream {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let response = check_status(endpoint, response).await?;
        decode_json(endpoint, response).await
    }

    async fn send<F>(&self, endpoint: &str, build: F) -> AppResult<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            debug!(endpoint = %endpoint, attempt, "Sending backend request");

            match build(&self.http).send().await {
                Ok(response) => return check_status(endpoint, response).await,
                Err(source) if attempt < self.max_retries => {
                    attempt += 1;
                    warn!(endpoint = %endpoint, attempt, error = %source, "Backend request failed, retrying");
                    sleep(Duration::from_millis(RETRY_DELAY_MS * u64::from(attempt))).await;
                }
                Err(source) => {
                    return Err(AppError::Upstream {
                        endpoint: endpoint.to_string(),
                        source,
                    })
                }
            }
        }
    }
}

/// Percent-encode an identifier for use as a single path segment. Item and
/// unit names may contain `/`, spaces or quotes.
pub fn path_segment(text: &str) -> String {
    urlencoding::encode(text).into_owned()
}

async fn check_status(endpoint: &str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    let detail = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
        .and_then(|body| body.error);

    Err(AppError::UpstreamStatus {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        detail,
    })
}

async fn decode_json<T: DeserializeOwned>(endpoint: &str, response: Response) -> AppResult<T> {
    let bytes = response.bytes().await.map_err(|source| AppError::Upstream {
        endpoint: endpoint.to_string(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|e| AppError::Decode {
        endpoint: endpoint.to_string(),
        message: e.to_string(),
    })
}
