//! Punctuation and dialogue helpers shared by every rendering pass.
//!
//! The continuous layout walks each paragraph twice (interleaved pairs, then
//! the plain source paragraph) and the side-by-side layout walks it once more.
//! All three take their line-break decisions from [`dialog_breaks`], so the
//! placement is identical across passes.

use crate::document::Paragraph;

macro_rules! regex {
    ($pattern:expr) => {{
        use std::sync::OnceLock;
        static REGEX: OnceLock<regex::Regex> = OnceLock::new();
        REGEX.get_or_init(|| regex::Regex::new($pattern).unwrap_or_else(|e| panic!("{}", e)))
    }};
}

/// Split a run of trailing punctuation (`. , ! ? … :`) off the end of `text`.
///
/// Returns `(core, punctuation)`; `core + punctuation == text` always holds.
pub fn split_trailing_punctuation(text: &str) -> (&str, &str) {
    match regex!(r"[.,!?…:]+$").find(text) {
        Some(m) => (&text[..m.start()], m.as_str()),
        None => (text, ""),
    }
}

/// Whether `text` opens a line of dialogue: one or two ASCII hyphens, or an
/// em-dash, followed by whitespace.
pub fn starts_dialog(text: &str) -> bool {
    regex!(r"^(-{1,2}|—)\s").is_match(text)
}

/// Whether `text` ends with sentence-ending punctuation. The colon counts,
/// since it commonly introduces a quoted line; the comma does not.
pub fn ends_sentence(text: &str) -> bool {
    regex!(r"[.!?…:]+$").is_match(text)
}

/// Evaluate the dialogue line-break rule for every syntagma of a paragraph.
///
/// Entry `i` is true when syntagma `i` starts a dialogue line and is either
/// the first of the paragraph or follows a syntagma whose raw source text ends
/// a sentence.
pub fn dialog_breaks(paragraph: &Paragraph) -> Vec<bool> {
    let mut breaks = Vec::with_capacity(paragraph.syntagmas.len());
    let mut previous_ends_sentence = false;

    for (i, syntagma) in paragraph.syntagmas.iter().enumerate() {
        let (core, _) = split_trailing_punctuation(&syntagma.source_text);
        breaks.push(starts_dialog(core) && (i == 0 || previous_ends_sentence));
        previous_ends_sentence = ends_sentence(&syntagma.source_text);
    }

    breaks
}
