//! Mock bilingual service for testing
//!
//! A deterministic, network-free stand-in for the bilingual text API. By
//! default it "translates" by appending the target language to every
//! syntagma (`Hello.` → `Hello_es.`), the way a suffix translator would, so
//! the whole flow can be exercised offline.
//!
//! # Example
//!
//! ```ignore
//! use bilingual_render::service::{Endpoint, MockService, ServiceError};
//!
//! let mock = MockService::new().with_failure(
//!     Endpoint::Lemmatize,
//!     ServiceError::Network("connection reset".to_string()),
//! );
//! ```

use crate::document::{
    AudioResponse, BilingualDocument, BuildResponse, CurrentUser, LemmaEntry, LemmaResponse,
    Paragraph, Question, Syntagma,
};
use crate::punctuation::split_trailing_punctuation;
use crate::service::client::BilingualService;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::request::{AudioRequest, BuildRequest, ExportRequest, LemmatizeRequest};
use async_trait::async_trait;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::Mutex;
use std::time::Duration;

/// The operations of [`BilingualService`], used to script failures and to
/// inspect which calls were made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    BuildDocument,
    Lemmatize,
    MakeAudio,
    ExportPdf,
    CurrentUser,
    Logout,
}

/// Mock service with canned or generated responses
#[derive(Debug, Default)]
pub struct MockService {
    /// Returned by `build_document` instead of a generated document
    document: Option<BuildResponse>,
    /// Returned by `lemmatize` instead of a computed frequency list
    lemmas: Option<LemmaResponse>,
    failures: HashMap<Endpoint, ServiceError>,
    /// Delays (ms) applied to successive `build_document` calls
    build_delays: Mutex<VecDeque<u64>>,
    calls: Mutex<Vec<Endpoint>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always answer `build_document` with `response`.
    pub fn with_document(mut self, response: BuildResponse) -> Self {
        self.document = Some(response);
        self
    }

    /// Always answer `lemmatize` with `response`.
    pub fn with_lemmas(mut self, response: LemmaResponse) -> Self {
        self.lemmas = Some(response);
        self
    }

    /// Make every call to `endpoint` fail with `error`.
    pub fn with_failure(mut self, endpoint: Endpoint, error: ServiceError) -> Self {
        self.failures.insert(endpoint, error);
        self
    }

    /// Delay the n-th `build_document` call by `delays[n]` milliseconds.
    pub fn with_build_delays(self, delays: Vec<u64>) -> Self {
        *self.build_delays.lock().unwrap_or_else(|e| e.into_inner()) = delays.into();
        self
    }

    /// Endpoints called so far, in call order.
    pub fn calls(&self) -> Vec<Endpoint> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        self.calls().iter().filter(|&&e| e == endpoint).count()
    }

    fn record(&self, endpoint: Endpoint) -> ServiceResult<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(endpoint);
        match self.failures.get(&endpoint) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn apply_build_delay(&self) {
        let delay = self
            .build_delays
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(0);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

/// Split text into paragraphs on blank lines and into syntagmas after every
/// word carrying trailing punctuation, then suffix each syntagma with the
/// target language.
fn suffix_document(text: &str, target_language: &str) -> BilingualDocument {
    let paragraphs = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .map(|p| {
            let mut syntagmas = Vec::new();
            let mut current: Vec<&str> = Vec::new();
            for word in p.split_whitespace() {
                current.push(word);
                let (_, punctuation) = split_trailing_punctuation(word);
                if !punctuation.is_empty() {
                    syntagmas.push(suffix_syntagma(&current.join(" "), target_language));
                    current.clear();
                }
            }
            if !current.is_empty() {
                syntagmas.push(suffix_syntagma(&current.join(" "), target_language));
            }
            Paragraph::new(syntagmas)
        })
        .collect();
    BilingualDocument::new(paragraphs)
}

fn suffix_syntagma(source: &str, target_language: &str) -> Syntagma {
    let (core, punctuation) = split_trailing_punctuation(source);
    let target = format!("{}_{}{}", core, target_language, punctuation);
    Syntagma::new(source, &target)
}

fn content_hash(text: &str, target_language: &str) -> String {
    let mut hasher = DefaultHasher::new();
    text.hash(&mut hasher);
    target_language.hash(&mut hasher);
    hasher.finish().to_string()
}

/// Word frequencies, lowercased, most frequent first.
fn count_lemmas(text: &str) -> Vec<LemmaEntry> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for word in text.split_whitespace() {
        let word = word
            .trim_matches(|c: char| !c.is_alphanumeric())
            .to_lowercase();
        if !word.is_empty() {
            *counts.entry(word).or_insert(0) += 1;
        }
    }
    let mut entries: Vec<LemmaEntry> = counts
        .into_iter()
        .map(|(lemma, occurrences)| LemmaEntry {
            lemma,
            number_of_words: 1,
            number_of_occurrences: occurrences,
        })
        .collect();
    entries.sort_by(|a, b| b.number_of_occurrences.cmp(&a.number_of_occurrences));
    entries
}

#[async_trait]
impl BilingualService for MockService {
    async fn build_document(&self, request: &BuildRequest) -> ServiceResult<BuildResponse> {
        self.apply_build_delay().await;
        self.record(Endpoint::BuildDocument)?;

        if let Some(document) = &self.document {
            return Ok(document.clone());
        }

        let questions = (0..request.number_of_questions)
            .map(|i| Question {
                question: format!("Question {}?", i + 1),
                answer: format!("Answer {}.", i + 1),
            })
            .collect::<Vec<_>>();

        Ok(BuildResponse {
            document: suffix_document(&request.source_text, &request.target_language),
            data_hash: content_hash(&request.source_text, &request.target_language),
            questions: Some(questions),
            source_language: Some("en".to_string()),
            target_language: Some(request.target_language.clone()),
        })
    }

    async fn lemmatize(&self, request: &LemmatizeRequest) -> ServiceResult<LemmaResponse> {
        self.record(Endpoint::Lemmatize)?;
        if let Some(lemmas) = &self.lemmas {
            return Ok(lemmas.clone());
        }
        Ok(LemmaResponse {
            lemmas: Some(count_lemmas(&request.text)),
        })
    }

    async fn make_audio(&self, request: &AudioRequest) -> ServiceResult<AudioResponse> {
        self.record(Endpoint::MakeAudio)?;
        if request.ssml_only {
            Ok(AudioResponse {
                audio_url: None,
                ssml: Some(format!(
                    "<speak version=\"1.0\"><break time=\"{}ms\"/></speak>",
                    request.break_time_ms
                )),
            })
        } else {
            Ok(AudioResponse {
                audio_url: Some(format!(
                    "/static/data/{}/{}.mp3",
                    request.bilingual_text_hash,
                    request.output_format.as_str()
                )),
                ssml: None,
            })
        }
    }

    async fn export_pdf(&self, request: &ExportRequest) -> ServiceResult<Vec<u8>> {
        self.record(Endpoint::ExportPdf)?;
        Ok(format!("%PDF-1.4\n% {}\n", request.target_language).into_bytes())
    }

    async fn current_user(&self) -> ServiceResult<CurrentUser> {
        self.record(Endpoint::CurrentUser)?;
        Ok(CurrentUser {
            username: "reader".to_string(),
            role: "user".to_string(),
        })
    }

    async fn logout(&self) -> ServiceResult<()> {
        self.record(Endpoint::Logout)
    }

    fn service_name(&self) -> &str {
        "Mock Service"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Layout;
    use crate::service::request::{AudioFormat, OutputFormat};

    fn build_request(text: &str) -> BuildRequest {
        BuildRequest {
            source_text: text.to_string(),
            target_language: "es".to_string(),
            output_format: OutputFormat::Web,
            layout: Layout::Continuous,
            lemmatization: false,
            filter_out_stop_words: false,
            number_of_questions: 2,
        }
    }

    #[tokio::test]
    async fn test_suffix_document() {
        let mock = MockService::new();
        let response = mock
            .build_document(&build_request("He said. -- Go away!\n\nThe end"))
            .await
            .unwrap();

        let paragraphs = &response.document.paragraphs;
        assert_eq!(paragraphs.len(), 2);
        assert_eq!(
            paragraphs[0].syntagmas,
            vec![
                Syntagma::new("He said.", "He said_es."),
                Syntagma::new("-- Go away!", "-- Go away_es!"),
            ]
        );
        assert_eq!(paragraphs[1].syntagmas, vec![Syntagma::new("The end", "The end_es")]);
        assert_eq!(response.questions.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_hash_is_deterministic() {
        let mock = MockService::new();
        let a = mock.build_document(&build_request("Hi.")).await.unwrap();
        let b = mock.build_document(&build_request("Hi.")).await.unwrap();
        let c = mock.build_document(&build_request("Bye.")).await.unwrap();
        assert_eq!(a.data_hash, b.data_hash);
        assert_ne!(a.data_hash, c.data_hash);
    }

    #[tokio::test]
    async fn test_failure_is_returned_and_recorded() {
        let mock = MockService::new().with_failure(
            Endpoint::BuildDocument,
            ServiceError::Status {
                endpoint: "make_bilingual".to_string(),
                status: 500,
                message: "boom".to_string(),
            },
        );
        assert!(mock.build_document(&build_request("x")).await.is_err());
        assert_eq!(mock.calls(), vec![Endpoint::BuildDocument]);
    }

    #[tokio::test]
    async fn test_lemmas_counted_and_sorted() {
        let mock = MockService::new();
        let response = mock
            .lemmatize(&LemmatizeRequest {
                text: "the cat and the dog. The end".to_string(),
                language: "en".to_string(),
                filter_out_stop_words: false,
            })
            .await
            .unwrap();
        let lemmas = response.lemmas.unwrap();
        assert_eq!(lemmas[0].lemma, "the");
        assert_eq!(lemmas[0].number_of_occurrences, 3);
        assert_eq!(lemmas.len(), 5);
    }

    #[tokio::test]
    async fn test_audio_modes() {
        let mock = MockService::new();
        let mut request = AudioRequest {
            bilingual_text_hash: "42".to_string(),
            output_format: AudioFormat::Bilingual,
            break_time_ms: 750,
            ssml_only: true,
        };
        let ssml = mock.make_audio(&request).await.unwrap();
        assert!(ssml.ssml.unwrap().contains("750ms"));

        request.ssml_only = false;
        let audio = mock.make_audio(&request).await.unwrap();
        assert_eq!(audio.audio_url.as_deref(), Some("/static/data/42/bilingual.mp3"));
    }

    #[tokio::test]
    async fn test_build_delays_are_consumed_in_order() {
        let mock = MockService::new().with_build_delays(vec![30]);
        let start = std::time::Instant::now();
        mock.build_document(&build_request("a")).await.unwrap();
        assert!(start.elapsed().as_millis() >= 30);

        let start = std::time::Instant::now();
        mock.build_document(&build_request("a")).await.unwrap();
        assert!(start.elapsed().as_millis() < 30);
    }

    #[test]
    fn test_service_name() {
        assert_eq!(MockService::new().service_name(), "Mock Service");
    }
}
