//! Service trait for the bilingual text API
//!
//! The translation, lemmatization, speech and PDF back ends are opaque
//! external services. This trait is the seam between them and the
//! orchestration code, so the same flow runs against the HTTP API
//! ([`HttpBilingualService`](crate::service::HttpBilingualService)) or a
//! deterministic stand-in ([`MockService`](crate::service::MockService)).
//!
//! # Example
//!
//! ```ignore
//! use bilingual_render::service::{BilingualService, HttpBilingualService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = HttpBilingualService::new(&Config::from_env()?)?;
//!     let user = service.current_user().await?;
//!     println!("Signed in as {} ({})", user.username, user.role);
//!     Ok(())
//! }
//! ```

use crate::document::{AudioResponse, BuildResponse, CurrentUser, LemmaResponse};
use crate::service::error::ServiceResult;
use crate::service::request::{AudioRequest, BuildRequest, ExportRequest, LemmatizeRequest};
use async_trait::async_trait;

/// The external services consumed by the orchestrator
///
/// Every method is one request/response exchange; none retries. A
/// non-success answer is reported as
/// [`ServiceError::Status`](crate::service::ServiceError::Status), a missing
/// session as [`ServiceError::Unauthorized`](crate::service::ServiceError::Unauthorized).
#[async_trait]
pub trait BilingualService: Send + Sync {
    /// Build the aligned bilingual document for a source text
    ///
    /// The response carries the document, its `data_hash`, and optionally the
    /// generated questions and detected source language.
    async fn build_document(&self, request: &BuildRequest) -> ServiceResult<BuildResponse>;

    /// Lemma frequency list for a text
    async fn lemmatize(&self, request: &LemmatizeRequest) -> ServiceResult<LemmaResponse>;

    /// Generate audio, or only its SSML, for a previously built document
    async fn make_audio(&self, request: &AudioRequest) -> ServiceResult<AudioResponse>;

    /// Render the document as a PDF, returned as raw bytes
    async fn export_pdf(&self, request: &ExportRequest) -> ServiceResult<Vec<u8>>;

    /// Identity of the signed-in user
    async fn current_user(&self) -> ServiceResult<CurrentUser>;

    /// End the current session
    async fn logout(&self) -> ServiceResult<()>;

    /// Name used in log lines
    fn service_name(&self) -> &str;
}
