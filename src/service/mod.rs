/// External service access
///
/// The bilingual text API is consumed, never implemented, here: building the
/// aligned document, lemmatization, speech synthesis and PDF export all
/// happen behind HTTP. This module provides the request payloads, the
/// [`BilingualService`] trait, an HTTP implementation and a mock.
pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod request;

pub use client::BilingualService;
pub use error::{ServiceError, ServiceResult};
pub use http::HttpBilingualService;
pub use mock::{Endpoint, MockService};
pub use request::{AudioFormat, AudioRequest, BuildRequest, ExportRequest, LemmatizeRequest, OutputFormat};
