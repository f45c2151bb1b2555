//! Data model for bilingual documents and the auxiliary service payloads.
//!
//! These types mirror the JSON produced by the external build, lemmatize and
//! audio services. Nothing here is mutated after it has been received: a
//! render pass is a pure function of a [`BilingualDocument`] and a layout.

use serde::{Deserialize, Deserializer, Serialize};

/// The minimal aligned unit: one source span and its translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Syntagma {
    pub source_text: String,
    /// The build service may send `null` here; it is read as an empty string.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target_text: String,
}

impl Syntagma {
    pub fn new(source_text: &str, target_text: &str) -> Self {
        Self {
            source_text: source_text.to_string(),
            target_text: target_text.to_string(),
        }
    }
}

/// An ordered run of syntagmas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(rename = "Sintagmas", default)]
    pub syntagmas: Vec<Syntagma>,
}

impl Paragraph {
    pub fn new(syntagmas: Vec<Syntagma>) -> Self {
        Self { syntagmas }
    }
}

/// A translated text, as returned by the build service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BilingualDocument {
    #[serde(default)]
    pub paragraphs: Vec<Paragraph>,
}

impl BilingualDocument {
    pub fn new(paragraphs: Vec<Paragraph>) -> Self {
        Self { paragraphs }
    }

    /// Total number of syntagmas across all paragraphs.
    pub fn syntagma_count(&self) -> usize {
        self.paragraphs.iter().map(|p| p.syntagmas.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}

/// One row of the lemma frequency list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaEntry {
    pub lemma: String,
    pub number_of_words: u32,
    pub number_of_occurrences: u32,
}

/// A reading-comprehension question and its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub answer: String,
}

/// Full response of the build service.
///
/// The document is flattened into the response, so `paragraphs` sits next to
/// `data_hash` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildResponse {
    #[serde(flatten)]
    pub document: BilingualDocument,
    /// Opaque content identifier used to key the follow-up requests.
    #[serde(deserialize_with = "hash_as_string")]
    pub data_hash: String,
    #[serde(default)]
    pub questions: Option<Vec<Question>>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

/// Response of the lemmatize service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmaResponse {
    #[serde(default)]
    pub lemmas: Option<Vec<LemmaEntry>>,
}

/// Response of the audio service: either a download URL or inline SSML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioResponse {
    #[serde(default)]
    pub audio_url: Option<String>,
    #[serde(default)]
    pub ssml: Option<String>,
}

/// Identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub username: String,
    pub role: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// The service hashes documents with a signed integer; keep it opaque.
fn hash_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "data_hash must be a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_sintagmas_key() {
        let json = r#"{"paragraphs":[{"Sintagmas":[{"source_text":"Hello.","target_text":"Hola."}]}]}"#;
        let doc: BilingualDocument = serde_json::from_str(json).unwrap();
        assert_eq!(doc.paragraphs.len(), 1);
        assert_eq!(doc.paragraphs[0].syntagmas[0], Syntagma::new("Hello.", "Hola."));
    }

    #[test]
    fn test_null_target_text_is_empty() {
        let json = r#"{"source_text":"Hi","target_text":null}"#;
        let s: Syntagma = serde_json::from_str(json).unwrap();
        assert_eq!(s.target_text, "");

        let json = r#"{"source_text":"Hi"}"#;
        let s: Syntagma = serde_json::from_str(json).unwrap();
        assert_eq!(s.target_text, "");
    }

    #[test]
    fn test_build_response_numeric_hash() {
        let json = r#"{
            "paragraphs": [],
            "source_language": "en",
            "target_language": "es",
            "data_hash": -4417250932418312345
        }"#;
        let response: BuildResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.data_hash, "-4417250932418312345");
        assert_eq!(response.source_language.as_deref(), Some("en"));
        assert!(response.questions.is_none());
    }

    #[test]
    fn test_build_response_rejects_bad_hash() {
        let json = r#"{"paragraphs": [], "data_hash": [1, 2]}"#;
        assert!(serde_json::from_str::<BuildResponse>(json).is_err());
    }

    #[test]
    fn test_syntagma_count() {
        let doc = BilingualDocument::new(vec![
            Paragraph::new(vec![Syntagma::new("a", "b"), Syntagma::new("c", "d")]),
            Paragraph::new(vec![]),
            Paragraph::new(vec![Syntagma::new("e", "f")]),
        ]);
        assert_eq!(doc.syntagma_count(), 3);
    }
}
