//! Request payloads for the bilingual text services.

use crate::orchestrator::ValidationError;
use crate::render::Layout;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Unreserved characters stay as they are in query values.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// How the user wants the result delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered in the page
    #[default]
    Web,
    /// The raw document, pretty-printed
    Json,
    /// A PDF file from the export service
    Pdf,
}

impl FromStr for OutputFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "web" => Ok(OutputFormat::Web),
            "json" => Ok(OutputFormat::Json),
            "pdf" => Ok(OutputFormat::Pdf),
            other => Err(ValidationError::UnknownOutputFormat(other.to_string())),
        }
    }
}

/// Voicing mode of the generated audio.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioFormat {
    /// Each syntagma in the source language followed by its translation
    #[default]
    Bilingual,
    /// As `Bilingual`, then the source once more at reduced speed
    BilingualAndRepeatSourceSlowly,
    SourceLanguage,
    TargetLanguage,
}

impl AudioFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Bilingual => "bilingual",
            AudioFormat::BilingualAndRepeatSourceSlowly => "bilingual_and_repeat_source_slowly",
            AudioFormat::SourceLanguage => "source_language",
            AudioFormat::TargetLanguage => "target_language",
        }
    }
}

impl FromStr for AudioFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bilingual" => Ok(AudioFormat::Bilingual),
            "bilingual_and_repeat_source_slowly" => Ok(AudioFormat::BilingualAndRepeatSourceSlowly),
            "source_language" => Ok(AudioFormat::SourceLanguage),
            "target_language" => Ok(AudioFormat::TargetLanguage),
            other => Err(ValidationError::UnknownAudioFormat(other.to_string())),
        }
    }
}

/// Body of `POST /api/make_bilingual`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub source_text: String,
    pub target_language: String,
    pub output_format: OutputFormat,
    pub layout: Layout,
    pub lemmatization: bool,
    pub filter_out_stop_words: bool,
    pub number_of_questions: u32,
}

/// Body of `POST /api/lemmatize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LemmatizeRequest {
    pub text: String,
    pub language: String,
    pub filter_out_stop_words: bool,
}

/// Query of `GET /api/make_audio`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioRequest {
    pub bilingual_text_hash: String,
    pub output_format: AudioFormat,
    pub break_time_ms: u32,
    pub ssml_only: bool,
}

impl AudioRequest {
    /// Query parameters of the `make_audio` call.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("bilingual_text_hash", self.bilingual_text_hash.clone()),
            ("output_format", self.output_format.as_str().to_string()),
            ("break_time_ms", self.break_time_ms.to_string()),
            ("ssml_only", self.ssml_only.to_string()),
        ]
    }

    /// Query string for the SSML download link, which omits `ssml_only`.
    pub fn download_query(&self) -> String {
        format!(
            "bilingual_text_hash={}&output_format={}&break_time_ms={}",
            utf8_percent_encode(&self.bilingual_text_hash, QUERY_VALUE),
            self.output_format.as_str(),
            self.break_time_ms
        )
    }
}

/// Body of `POST /api/make-pdf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub source_text: String,
    pub target_language: String,
    pub layout: Layout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("web".parse::<OutputFormat>().unwrap(), OutputFormat::Web);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("pdf".parse::<OutputFormat>().unwrap(), OutputFormat::Pdf);
        assert!(matches!(
            "docx".parse::<OutputFormat>(),
            Err(ValidationError::UnknownOutputFormat(f)) if f == "docx"
        ));
    }

    #[test]
    fn test_audio_format_round_trip_names() {
        for format in [
            AudioFormat::Bilingual,
            AudioFormat::BilingualAndRepeatSourceSlowly,
            AudioFormat::SourceLanguage,
            AudioFormat::TargetLanguage,
        ] {
            assert_eq!(format.as_str().parse::<AudioFormat>().unwrap(), format);
            assert_eq!(
                serde_json::to_string(&format).unwrap(),
                format!("\"{}\"", format.as_str())
            );
        }
        assert!("mp3".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn test_build_request_wire_shape() {
        let request = BuildRequest {
            source_text: "Hello.".to_string(),
            target_language: "es".to_string(),
            output_format: OutputFormat::Web,
            layout: Layout::SideBySide,
            lemmatization: true,
            filter_out_stop_words: false,
            number_of_questions: 2,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["output_format"], "web");
        assert_eq!(json["layout"], "side-by-side");
        assert_eq!(json["number_of_questions"], 2);
    }

    #[test]
    fn test_download_query_omits_ssml_flag() {
        let request = AudioRequest {
            bilingual_text_hash: "-42".to_string(),
            output_format: AudioFormat::SourceLanguage,
            break_time_ms: 750,
            ssml_only: true,
        };
        assert_eq!(
            request.download_query(),
            "bilingual_text_hash=-42&output_format=source_language&break_time_ms=750"
        );
    }

    #[test]
    fn test_params_carry_ssml_flag() {
        let request = AudioRequest {
            bilingual_text_hash: "7".to_string(),
            output_format: AudioFormat::Bilingual,
            break_time_ms: 500,
            ssml_only: false,
        };
        assert_eq!(
            request.params(),
            vec![
                ("bilingual_text_hash", "7".to_string()),
                ("output_format", "bilingual".to_string()),
                ("break_time_ms", "500".to_string()),
                ("ssml_only", "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_download_query_encodes_hash() {
        let request = AudioRequest {
            bilingual_text_hash: "a b&c".to_string(),
            output_format: AudioFormat::Bilingual,
            break_time_ms: 1,
            ssml_only: false,
        };
        assert!(request.download_query().starts_with("bilingual_text_hash=a%20b%26c&"));

        let request = AudioRequest {
            bilingual_text_hash: "x/y?é".to_string(),
            ..request
        };
        assert!(request.download_query().starts_with("bilingual_text_hash=x%2Fy%3F%C3%A9&"));
    }
}
