//! Continuous layout: flowing prose with inline translations.
//!
//! Each paragraph becomes two blocks. The first interleaves every syntagma
//! with its translation, `source (target)`, with the source's trailing
//! punctuation after the closing parenthesis. The second repeats the plain
//! source paragraph. Dialogue lines start on a new row in both blocks.

use super::escape_html;
use crate::document::{BilingualDocument, Paragraph, Syntagma};
use crate::punctuation::{dialog_breaks, split_trailing_punctuation};

const LINE_BREAK: &str = "<br>";

/// Render every paragraph of `document` in the continuous layout.
///
/// Returns an empty string for a document without paragraphs.
pub fn render_continuous(document: &BilingualDocument) -> String {
    let mut html = String::new();
    for paragraph in &document.paragraphs {
        html.push_str(&render_paragraph(paragraph));
    }
    html
}

fn render_paragraph(paragraph: &Paragraph) -> String {
    let breaks = dialog_breaks(paragraph);

    let mut html = String::from("<div class=\"paragraph\">");
    html.push_str("<div>");
    html.push_str(&interleaved_line(paragraph, &breaks));
    html.push_str("</div>");
    html.push_str("<div style=\"margin-top:0.5em;font-style:italic;\">");
    html.push_str(&source_line(paragraph, &breaks));
    html.push_str("</div></div>");
    // blank line between paragraphs
    html.push_str(LINE_BREAK);
    html
}

/// `source (target)` pairs, space separated.
fn interleaved_line(paragraph: &Paragraph, breaks: &[bool]) -> String {
    paragraph
        .syntagmas
        .iter()
        .zip(breaks)
        .map(|(syntagma, &line_break)| {
            let pair = render_pair(syntagma);
            if line_break {
                format!("{}{}", LINE_BREAK, pair)
            } else {
                pair
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// The untouched source texts joined with single spaces.
fn source_line(paragraph: &Paragraph, breaks: &[bool]) -> String {
    paragraph
        .syntagmas
        .iter()
        .zip(breaks)
        .map(|(syntagma, &line_break)| {
            let text = escape_html(&syntagma.source_text);
            if line_break {
                format!("{}{}", LINE_BREAK, text)
            } else {
                text.into_owned()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render one syntagma as `<span>core</span> <span>(translation)</span>punctuation`.
///
/// Trailing punctuation is stripped from both sides and only the source's is
/// shown, after the closing parenthesis: `He said,`/`Él dijo.` renders as
/// `He said (Él dijo),`.
fn render_pair(syntagma: &Syntagma) -> String {
    let (source, punctuation) = split_trailing_punctuation(&syntagma.source_text);
    let (target, _) = split_trailing_punctuation(&syntagma.target_text);

    format!(
        "<span>{}</span> <span class=\"syntagma-translation\">({})</span>{}",
        escape_html(source),
        escape_html(target),
        escape_html(punctuation)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(paragraphs: Vec<Vec<(&str, &str)>>) -> BilingualDocument {
        BilingualDocument::new(
            paragraphs
                .into_iter()
                .map(|p| Paragraph::new(p.into_iter().map(|(s, t)| Syntagma::new(s, t)).collect()))
                .collect(),
        )
    }

    #[test]
    fn test_single_syntagma() {
        let doc = document(vec![vec![("Hello.", "Hola.")]]);
        assert_eq!(
            render_continuous(&doc),
            "<div class=\"paragraph\"><div>\
             <span>Hello</span> <span class=\"syntagma-translation\">(Hola)</span>.\
             </div><div style=\"margin-top:0.5em;font-style:italic;\">Hello.</div></div><br>"
        );
    }

    #[test]
    fn test_pairs_are_space_separated_in_order() {
        let doc = document(vec![vec![("I see", "Veo"), ("a cat,", "un gato,"), ("and a dog.", "y un perro.")]]);
        let html = render_continuous(&doc);
        assert!(html.contains(
            "<span>I see</span> <span class=\"syntagma-translation\">(Veo)</span> \
             <span>a cat</span> <span class=\"syntagma-translation\">(un gato)</span>, \
             <span>and a dog</span> <span class=\"syntagma-translation\">(y un perro)</span>."
        ));
        assert!(html.contains(">I see a cat, and a dog.</div>"));
    }

    #[test]
    fn test_dialog_break_after_sentence_end() {
        let doc = document(vec![vec![("He said.", "Él dijo."), ("-- Go away!", "¡Vete!")]]);
        let html = render_continuous(&doc);
        assert!(html.contains(
            "(Él dijo)</span>. <br><span>-- Go away</span> <span class=\"syntagma-translation\">(¡Vete)</span>!"
        ));
        assert!(html.contains(">He said. <br>-- Go away!</div>"));
    }

    #[test]
    fn test_dialog_break_on_first_syntagma() {
        let doc = document(vec![vec![("— Hola,", "— Hello,"), ("dijo.", "he said.")]]);
        let html = render_continuous(&doc);
        assert!(html.starts_with("<div class=\"paragraph\"><div><br><span>— Hola</span>"));
        assert!(html.contains("font-style:italic;\"><br>— Hola, dijo.</div>"));
    }

    #[test]
    fn test_no_break_mid_sentence() {
        let doc = document(vec![vec![("He said,", "Él dijo,"), ("-- go away", "vete")]]);
        let html = render_continuous(&doc);
        assert!(!html.contains("<br><span>"));
        assert_eq!(html.matches(LINE_BREAK).count(), 1);
    }

    #[test]
    fn test_both_passes_break_identically() {
        let doc = document(vec![vec![
            ("She answered:", "Ella respondió:"),
            ("— No.", "— No."),
            ("— Why", "— Por qué"),
            ("— Because…", "— Porque…"),
        ]]);
        let html = render_continuous(&doc);
        let (interleaved, plain) = html.split_once("font-style:italic;").unwrap();
        // one paragraph separator lives in the trailing part
        assert_eq!(interleaved.matches(LINE_BREAK).count(), 2);
        assert_eq!(plain.matches(LINE_BREAK).count(), 2 + 1);
    }

    #[test]
    fn test_target_punctuation_always_stripped() {
        let doc = document(vec![vec![("He said,", "Él dijo."), ("Hello.", "¿Hola?")]]);
        let html = render_continuous(&doc);
        assert!(html.contains("(Él dijo)</span>, "));
        assert!(html.contains("(¿Hola)</span>."));
        assert!(!html.contains("dijo.)"));
        assert!(!html.contains("?)"));
    }

    #[test]
    fn test_empty_source_text() {
        let doc = document(vec![vec![("", "")]]);
        let html = render_continuous(&doc);
        assert!(html.contains("<div><span></span> <span class=\"syntagma-translation\">()</span></div>"));
    }

    #[test]
    fn test_paragraphs_separated() {
        let doc = document(vec![vec![("One.", "Uno.")], vec![("Two.", "Dos.")]]);
        let html = render_continuous(&doc);
        assert_eq!(html.matches("<div class=\"paragraph\">").count(), 2);
        assert!(html.contains("</div></div><br><div class=\"paragraph\">"));
    }

    #[test]
    fn test_escapes_text() {
        let doc = document(vec![vec![("<i>x</i>", "a & b")]]);
        let html = render_continuous(&doc);
        assert!(html.contains("<span>&lt;i&gt;x&lt;/i&gt;</span>"));
        assert!(html.contains("(a &amp; b)"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render_continuous(&BilingualDocument::default()), "");
    }
}
