//! Submission handling: validation, dispatch and follow-up requests
//!
//! A submission is validated before any network call, then dispatched by its
//! output format:
//!
//! - `web`: build the document, render it with its questions, then (if asked)
//!   fetch and render the lemma table
//! - `json`: build the document (or its lemma list) and pretty-print it
//! - `pdf`: fetch the exported PDF as a download
//!
//! Every path ends in a terminal [`DisplayState`]: a result, an inline error
//! message or a login redirect. A result is never left pending.
//!
//! Re-submitting while an earlier submission is still in flight cancels the
//! earlier one: its response is dropped as [`Outcome::Superseded`] and no
//! follow-up requests are made for it.

use crate::config::Config;
use crate::document::CurrentUser;
use crate::questions::QuestionPanel;
use crate::render::{render, render_lemmas, render_questions, Layout};
use crate::service::{
    AudioFormat, AudioRequest, BilingualService, BuildRequest, ExportRequest, LemmatizeRequest,
    OutputFormat, ServiceError,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, warn};

/// Longest source text accepted by the form, in characters.
pub const MAX_SOURCE_CHARS: usize = 50_000;
pub const DEFAULT_NUMBER_OF_QUESTIONS: u32 = 2;
pub const MAX_NUMBER_OF_QUESTIONS: u32 = 20;
pub const PDF_FILE_NAME: &str = "bilingual_text.pdf";
/// Where an unauthenticated user is sent.
pub const LOGIN_PATH: &str = "/login";

/// Input rejected before any request is made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    MissingSourceText,
    MissingTargetLanguage,
    TextTooLong { length: usize, max: usize },
    TooManyQuestions { requested: u32, max: u32 },
    UnknownOutputFormat(String),
    UnknownLayout(String),
    UnknownAudioFormat(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::MissingSourceText => write!(f, "Please enter a text to translate"),
            ValidationError::MissingTargetLanguage => write!(f, "Please choose a target language"),
            ValidationError::TextTooLong { length, max } => {
                write!(f, "Text is too long: {}/{} characters", length, max)
            }
            ValidationError::TooManyQuestions { requested, max } => {
                write!(f, "Too many questions: {} (at most {})", requested, max)
            }
            ValidationError::UnknownOutputFormat(s) => write!(f, "Unknown output format: {}", s),
            ValidationError::UnknownLayout(s) => write!(f, "Unknown layout: {}", s),
            ValidationError::UnknownAudioFormat(s) => write!(f, "Unknown audio format: {}", s),
        }
    }
}

impl std::error::Error for ValidationError {}

/// The request that failed, which decides the message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Document,
    Lemmas,
    Pdf,
    Audio { ssml_only: bool },
}

/// Why a submission produced no result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    Validation(ValidationError),
    Service { stage: Stage, error: ServiceError },
    /// An audio request was made before any document was loaded
    NotLoaded,
    /// A response could not be re-encoded for display
    Encode(String),
}

impl SubmitError {
    fn service(stage: Stage, error: ServiceError) -> Self {
        SubmitError::Service { stage, error }
    }

    /// Whether the user has to sign in again.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            SubmitError::Service {
                error: ServiceError::Unauthorized,
                ..
            }
        )
    }

    /// The message to show in place of the result.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Validation(e) => e.to_string(),
            SubmitError::NotLoaded => {
                "Data not loaded yet. Please wait for the bilingual result to load.".to_string()
            }
            SubmitError::Encode(msg) => format!("An error occurred: {}", msg),
            SubmitError::Service { error: ServiceError::Unauthorized, .. } => {
                "Not authenticated".to_string()
            }
            SubmitError::Service { stage, error } => {
                let status = matches!(error, ServiceError::Status { .. });
                match (stage, status) {
                    (Stage::Document, true) => "Error loading data".to_string(),
                    (Stage::Lemmas, true) => "Error loading lemma data".to_string(),
                    (Stage::Pdf, true) => "Error generating PDF. Please try again.".to_string(),
                    (Stage::Pdf, false) => {
                        "An error occurred while generating the PDF.".to_string()
                    }
                    (Stage::Audio { ssml_only: true }, true) => "Failed to generate SSML.".to_string(),
                    (Stage::Audio { ssml_only: false }, true) => {
                        "Failed to generate audio.".to_string()
                    }
                    (Stage::Audio { ssml_only: true }, false) => {
                        format!("Error generating SSML: {}", error)
                    }
                    (Stage::Audio { ssml_only: false }, false) => {
                        format!("Error generating audio: {}", error)
                    }
                    (Stage::Document | Stage::Lemmas, false) => {
                        format!("An error occurred: {}", error)
                    }
                }
            }
        }
    }
}

impl std::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubmitError::Service { error, .. } => write!(f, "{}", error),
            other => write!(f, "{}", other.user_message()),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(e: ValidationError) -> Self {
        SubmitError::Validation(e)
    }
}

/// Raw form values, as typed by the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormInput {
    #[serde(default)]
    pub source_text: String,
    #[serde(default)]
    pub target_language: String,
    #[serde(default)]
    pub output_format: Option<String>,
    #[serde(default)]
    pub layout: Option<String>,
    /// Either a number or the text of the number field.
    #[serde(default)]
    pub number_of_questions: Option<serde_json::Value>,
    #[serde(default)]
    pub lemmatization: bool,
    #[serde(default)]
    pub filter_out_stop_words: bool,
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub source_text: String,
    pub target_language: String,
    pub output_format: OutputFormat,
    pub layout: Layout,
    pub number_of_questions: u32,
    pub lemmatization: bool,
    /// Only meaningful together with `lemmatization`.
    pub filter_out_stop_words: bool,
}

impl Submission {
    /// Check the fields that do not need a round trip to the service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.source_text.trim().is_empty() {
            return Err(ValidationError::MissingSourceText);
        }
        if self.target_language.trim().is_empty() {
            return Err(ValidationError::MissingTargetLanguage);
        }
        let length = self.source_text.chars().count();
        if length > MAX_SOURCE_CHARS {
            return Err(ValidationError::TextTooLong {
                length,
                max: MAX_SOURCE_CHARS,
            });
        }
        if self.number_of_questions > MAX_NUMBER_OF_QUESTIONS {
            return Err(ValidationError::TooManyQuestions {
                requested: self.number_of_questions,
                max: MAX_NUMBER_OF_QUESTIONS,
            });
        }
        Ok(())
    }

    pub fn build_request(&self) -> BuildRequest {
        BuildRequest {
            source_text: self.source_text.clone(),
            target_language: self.target_language.clone(),
            output_format: self.output_format,
            layout: self.layout,
            lemmatization: self.lemmatization,
            filter_out_stop_words: self.filter_out_stop_words,
            number_of_questions: self.number_of_questions,
        }
    }

    pub fn export_request(&self) -> ExportRequest {
        ExportRequest {
            source_text: self.source_text.clone(),
            target_language: self.target_language.clone(),
            layout: self.layout,
        }
    }

    fn lemmatize_request(&self, language: &str) -> LemmatizeRequest {
        LemmatizeRequest {
            text: self.source_text.clone(),
            language: language.to_string(),
            filter_out_stop_words: self.filter_out_stop_words,
        }
    }
}

impl TryFrom<FormInput> for Submission {
    type Error = ValidationError;

    fn try_from(form: FormInput) -> Result<Self, Self::Error> {
        let output_format = match form.output_format.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => OutputFormat::default(),
        };
        let layout = match form.layout.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => Layout::default(),
        };
        let number_of_questions = match &form.number_of_questions {
            Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(serde_json::Value::String(s)) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
        .unwrap_or(DEFAULT_NUMBER_OF_QUESTIONS);

        let submission = Submission {
            source_text: form.source_text,
            target_language: form.target_language.trim().to_string(),
            output_format,
            layout,
            number_of_questions,
            lemmatization: form.lemmatization,
            filter_out_stop_words: form.lemmatization && form.filter_out_stop_words,
        };
        submission.validate()?;
        Ok(submission)
    }
}

/// What a rendered result needs for its follow-up requests. Owned by the
/// result view for as long as it is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSession {
    pub data_hash: String,
    pub source_language: Option<String>,
    pub target_language: String,
    pub layout: Layout,
}

/// A document rendered for the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResult {
    pub session: ResultSession,
    /// The rendered document followed by the question list.
    pub content: String,
    pub questions: QuestionPanel,
    /// Lemma table, or an inline error, when lemmatization was requested.
    pub lemmas: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDownload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Web(WebResult),
    /// Pretty-printed JSON
    Json(String),
    Pdf(PdfDownload),
    /// A newer submission started before this one finished
    Superseded,
}

/// Terminal state of the result area after a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Ready(Outcome),
    Error(String),
    /// Send the user to [`LOGIN_PATH`]
    LoginRequired,
}

impl From<Result<Outcome, SubmitError>> for DisplayState {
    fn from(result: Result<Outcome, SubmitError>) -> Self {
        match result {
            Ok(outcome) => DisplayState::Ready(outcome),
            Err(e) if e.requires_login() => DisplayState::LoginRequired,
            Err(e) => DisplayState::Error(e.user_message()),
        }
    }
}

/// Options of the audio form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioOptions {
    pub format: AudioFormat,
    /// Pause after each syntagma; the configured default when `None`
    pub break_time_ms: Option<u32>,
    pub ssml_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioOutcome {
    Audio { url: String },
    Ssml { markup: String, download_url: String },
    /// The service succeeded but returned neither a link nor SSML
    NoLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    SignedIn(CurrentUser),
    LoginRequired,
}

/// Drives submissions against a [`BilingualService`].
#[derive(Debug)]
pub struct Orchestrator<S: BilingualService> {
    service: S,
    config: Config,
    generation: AtomicU64,
}

impl<S: BilingualService> Orchestrator<S> {
    pub fn new(service: S, config: Config) -> Self {
        Self {
            service,
            config,
            generation: AtomicU64::new(0),
        }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Validate and dispatch one submission.
    pub async fn submit(&self, submission: &Submission) -> Result<Outcome, SubmitError> {
        submission.validate()?;
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        info!(
            "Submission #{}: {:?} output, {} layout, {} chars → {} via {}",
            generation,
            submission.output_format,
            submission.layout,
            submission.source_text.chars().count(),
            submission.target_language,
            self.service.service_name()
        );

        match submission.output_format {
            OutputFormat::Web => self.submit_web(submission, generation).await,
            OutputFormat::Json => self.submit_json(submission, generation).await,
            OutputFormat::Pdf => self.submit_pdf(submission, generation).await,
        }
    }

    async fn submit_web(&self, submission: &Submission, generation: u64) -> Result<Outcome, SubmitError> {
        let response = self
            .service
            .build_document(&submission.build_request())
            .await
            .map_err(|e| SubmitError::service(Stage::Document, e))?;
        if !self.is_current(generation) {
            debug!("Dropping stale document for submission #{}", generation);
            return Ok(Outcome::Superseded);
        }
        info!(
            "data_hash = {} ({} paragraphs, {} syntagmas)",
            response.data_hash,
            response.document.paragraphs.len(),
            response.document.syntagma_count()
        );

        let mut content = render(&response.document, submission.layout);
        content.push_str(&render_questions(response.questions.as_deref()));
        let question_count = response.questions.as_ref().map_or(0, Vec::len);

        let session = ResultSession {
            data_hash: response.data_hash,
            source_language: response.source_language,
            target_language: submission.target_language.clone(),
            layout: submission.layout,
        };

        let lemmas = if submission.lemmatization {
            let panel = self.lemma_panel(submission, session.source_language.as_deref()).await;
            if !self.is_current(generation) {
                debug!("Dropping stale lemma table for submission #{}", generation);
                return Ok(Outcome::Superseded);
            }
            Some(panel)
        } else {
            None
        };

        Ok(Outcome::Web(WebResult {
            session,
            content,
            questions: QuestionPanel::new(question_count),
            lemmas,
        }))
    }

    /// The lemma table, or the inline lemma error. Never fails the submission.
    async fn lemma_panel(&self, submission: &Submission, source_language: Option<&str>) -> String {
        let Some(language) = source_language else {
            warn!("Build response carried no source language; skipping lemmatization");
            return error_markup(&SubmitError::service(
                Stage::Lemmas,
                ServiceError::Decode("missing source_language".to_string()),
            ));
        };

        match self.service.lemmatize(&submission.lemmatize_request(language)).await {
            Ok(response) => render_lemmas(response.lemmas.as_deref()),
            Err(e) => {
                warn!("Lemmatization failed: {}", e);
                error_markup(&SubmitError::service(Stage::Lemmas, e))
            }
        }
    }

    async fn submit_json(&self, submission: &Submission, generation: u64) -> Result<Outcome, SubmitError> {
        let response = self
            .service
            .build_document(&submission.build_request())
            .await
            .map_err(|e| SubmitError::service(Stage::Document, e))?;
        if !self.is_current(generation) {
            return Ok(Outcome::Superseded);
        }

        let json = if submission.lemmatization {
            let language = response
                .source_language
                .as_deref()
                .unwrap_or(&submission.target_language);
            let lemmas = self
                .service
                .lemmatize(&submission.lemmatize_request(language))
                .await
                .map_err(|e| SubmitError::service(Stage::Lemmas, e))?;
            if !self.is_current(generation) {
                return Ok(Outcome::Superseded);
            }
            serde_json::to_string_pretty(&lemmas)
        } else {
            serde_json::to_string_pretty(&response)
        }
        .map_err(|e| SubmitError::Encode(e.to_string()))?;

        Ok(Outcome::Json(json))
    }

    async fn submit_pdf(&self, submission: &Submission, generation: u64) -> Result<Outcome, SubmitError> {
        let bytes = self
            .service
            .export_pdf(&submission.export_request())
            .await
            .map_err(|e| SubmitError::service(Stage::Pdf, e))?;
        if !self.is_current(generation) {
            return Ok(Outcome::Superseded);
        }
        info!("Received PDF ({} bytes)", bytes.len());
        Ok(Outcome::Pdf(PdfDownload {
            file_name: PDF_FILE_NAME.to_string(),
            bytes,
        }))
    }

    /// Request audio, or only its SSML, for the document shown in `session`.
    pub async fn request_audio(
        &self,
        session: Option<&ResultSession>,
        options: &AudioOptions,
    ) -> Result<AudioOutcome, SubmitError> {
        let session = session.ok_or(SubmitError::NotLoaded)?;
        let request = AudioRequest {
            bilingual_text_hash: session.data_hash.clone(),
            output_format: options.format,
            break_time_ms: options.break_time_ms.unwrap_or(self.config.break_time_ms),
            ssml_only: options.ssml_only,
        };
        info!(
            "Requesting {} for {} ({:?}, {} ms breaks)",
            if options.ssml_only { "SSML" } else { "audio" },
            request.bilingual_text_hash,
            request.output_format,
            request.break_time_ms
        );

        let response = self
            .service
            .make_audio(&request)
            .await
            .map_err(|e| SubmitError::service(Stage::Audio { ssml_only: options.ssml_only }, e))?;

        Ok(match (options.ssml_only, response.ssml, response.audio_url) {
            (true, Some(markup), _) => AudioOutcome::Ssml {
                markup,
                download_url: format!(
                    "{}/api/download_ssml?{}",
                    self.config.api_url,
                    request.download_query()
                ),
            },
            (_, _, Some(url)) => AudioOutcome::Audio { url },
            _ => AudioOutcome::NoLink,
        })
    }

    /// Who is signed in, or that a login is needed.
    pub async fn check_session(&self) -> Result<SessionStatus, ServiceError> {
        match self.service.current_user().await {
            Ok(user) => Ok(SessionStatus::SignedIn(user)),
            Err(ServiceError::Unauthorized) => Ok(SessionStatus::LoginRequired),
            Err(e) => Err(e),
        }
    }

    /// End the session. The user lands on the login page either way.
    pub async fn logout(&self) -> SessionStatus {
        if let Err(e) = self.service.logout().await {
            warn!("Logout failed: {}", e);
        }
        SessionStatus::LoginRequired
    }
}

fn error_markup(error: &SubmitError) -> String {
    format!("<p>{}</p>", crate::render::escape_html(&error.user_message()))
}
