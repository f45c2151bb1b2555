//! Rendering and service plumbing for bilingual reading texts
//!
//! A bilingual text arrives from an external build service as paragraphs of
//! aligned source/translation pairs ("syntagmas"). This crate turns it into
//! HTML, in a continuous or a side-by-side layout, together with the lemma
//! frequency table and the reading-comprehension questions that accompany
//! it, and drives the requests that produce them.
//!
//! # Example
//!
//! ```ignore
//! use bilingual_render::{Config, FormInput, HttpBilingualService, Orchestrator, Submission};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let orchestrator = Orchestrator::new(HttpBilingualService::new(&config)?, config);
//!
//!     let submission = Submission::try_from(FormInput {
//!         source_text: "He said. -- Go away!".to_string(),
//!         target_language: "es".to_string(),
//!         ..FormInput::default()
//!     })?;
//!     let outcome = orchestrator.submit(&submission).await?;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod document;
pub mod orchestrator;
pub mod punctuation;
pub mod questions;
pub mod render;
pub mod service;


// Re-export the main types for convenient access
pub use config::{Config, ConfigError};
pub use document::{
    AudioResponse, BilingualDocument, BuildResponse, CurrentUser, LemmaEntry, LemmaResponse,
    Paragraph, Question, Syntagma,
};
pub use orchestrator::{
    AudioOptions, AudioOutcome, DisplayState, FormInput, Orchestrator, Outcome, PdfDownload,
    ResultSession, SessionStatus, SubmitError, Submission, ValidationError, WebResult,
};
pub use punctuation::{dialog_breaks, ends_sentence, split_trailing_punctuation, starts_dialog};
pub use questions::QuestionPanel;
pub use render::{Layout, render, render_lemmas, render_page, render_questions};
pub use service::{
    AudioFormat, BilingualService, HttpBilingualService, MockService, OutputFormat, ServiceError,
};
