//! HTTP client for the bilingual text API
//!
//! Talks JSON to the service at `Config::api_url`:
//!
//! | operation        | request                      |
//! |------------------|------------------------------|
//! | build document   | `POST /api/make_bilingual`   |
//! | lemmatize        | `POST /api/lemmatize`        |
//! | audio / SSML     | `GET  /api/make_audio?...`   |
//! | PDF export       | `POST /api/make-pdf`         |
//! | current user     | `GET  /api/current_user`     |
//! | logout           | `POST /api/logout`           |

use crate::config::Config;
use crate::document::{AudioResponse, BuildResponse, CurrentUser, LemmaResponse};
use crate::service::client::BilingualService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::request::{AudioRequest, BuildRequest, ExportRequest, LemmatizeRequest};
use async_trait::async_trait;
use reqwest::{Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Client for the bilingual text HTTP API
#[derive(Clone)]
pub struct HttpBilingualService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBilingualService {
    /// Create a client for the API described by `config`
    ///
    /// # Returns
    ///
    /// * `Err(ServiceError::Config)` - If the base URL is empty or the HTTP
    ///   client cannot be built
    pub fn new(config: &Config) -> ServiceResult<Self> {
        if config.api_url.trim().is_empty() {
            return Err(ServiceError::Config("API URL cannot be empty".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/make_audio` with the request's query parameters.
    fn audio_url(&self, request: &AudioRequest) -> ServiceResult<Url> {
        Url::parse_with_params(&self.url("/api/make_audio"), request.params())
            .map_err(|e| ServiceError::Config(format!("Invalid API URL: {}", e)))
    }

    /// Map a non-success response to a `ServiceError`, passing successes through.
    async fn check(endpoint: &str, response: Response) -> ServiceResult<Response> {
        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!("{} rejected the session ({})", endpoint, status);
            return Err(ServiceError::Unauthorized);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        warn!("{} failed with {}: {}", endpoint, status, body);

        Err(ServiceError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message: error_message(&body),
        })
    }

    async fn decode<T: DeserializeOwned>(endpoint: &str, response: Response) -> ServiceResult<T> {
        let response = Self::check(endpoint, response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::Decode(format!("{}: {}", endpoint, e)))
    }
}

/// The API reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| json["error"].as_str().map(|s| s.to_string()))
        .unwrap_or_else(|| body.trim().to_string())
}

impl std::fmt::Debug for HttpBilingualService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBilingualService")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[async_trait]
impl BilingualService for HttpBilingualService {
    async fn build_document(&self, request: &BuildRequest) -> ServiceResult<BuildResponse> {
        let response = self
            .client
            .post(self.url("/api/make_bilingual"))
            .json(request)
            .send()
            .await?;
        Self::decode("make_bilingual", response).await
    }

    async fn lemmatize(&self, request: &LemmatizeRequest) -> ServiceResult<LemmaResponse> {
        let response = self
            .client
            .post(self.url("/api/lemmatize"))
            .json(request)
            .send()
            .await?;
        Self::decode("lemmatize", response).await
    }

    async fn make_audio(&self, request: &AudioRequest) -> ServiceResult<AudioResponse> {
        let url = self.audio_url(request)?;
        let response = self.client.get(url).send().await?;
        Self::decode("make_audio", response).await
    }

    async fn export_pdf(&self, request: &ExportRequest) -> ServiceResult<Vec<u8>> {
        let response = self
            .client
            .post(self.url("/api/make-pdf"))
            .json(request)
            .send()
            .await?;
        let response = Self::check("make-pdf", response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn current_user(&self) -> ServiceResult<CurrentUser> {
        let response = self.client.get(self.url("/api/current_user")).send().await?;
        Self::decode("current_user", response).await
    }

    async fn logout(&self) -> ServiceResult<()> {
        let response = self.client.post(self.url("/api/logout")).send().await?;
        Self::check("logout", response).await?;
        Ok(())
    }

    fn service_name(&self) -> &str {
        "Bilingual HTTP API"
    }
}
