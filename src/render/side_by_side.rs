//! Side-by-side layout: a two-column table, one row per syntagma.
//!
//! Table rows cannot carry a line break, so rows that would start a dialogue
//! line in the continuous layout get the `dialog-line` class instead.

use super::escape_html;
use crate::document::BilingualDocument;
use crate::punctuation::dialog_breaks;

pub fn render_side_by_side(document: &BilingualDocument) -> String {
    if document.is_empty() {
        return String::new();
    }

    let mut html = String::from("<table><tr><th>Source</th><th>Translation</th></tr>");
    for paragraph in &document.paragraphs {
        let breaks = dialog_breaks(paragraph);
        for (syntagma, line_break) in paragraph.syntagmas.iter().zip(breaks) {
            let class = if line_break { " class=\"dialog-line\"" } else { "" };
            html.push_str(&format!(
                "<tr{}><td>{}</td><td class=\"syntagma-translation\">{}</td></tr>",
                class,
                escape_html(&syntagma.source_text),
                escape_html(&syntagma.target_text)
            ));
        }
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Paragraph, Syntagma};

    #[test]
    fn test_one_row_per_syntagma() {
        let doc = BilingualDocument::new(vec![
            Paragraph::new(vec![Syntagma::new("One,", "Uno,"), Syntagma::new("two.", "dos.")]),
            Paragraph::new(vec![Syntagma::new("Three.", "Tres.")]),
        ]);
        let html = render_side_by_side(&doc);
        // header row plus three syntagma rows
        assert_eq!(html.matches("<tr").count(), 4);

        let one = html.find("One,").unwrap();
        let two = html.find("two.").unwrap();
        let three = html.find("Three.").unwrap();
        assert!(one < two && two < three);
    }

    #[test]
    fn test_literal_text_with_punctuation() {
        let doc = BilingualDocument::new(vec![Paragraph::new(vec![Syntagma::new("Hello.", "Hola.")])]);
        assert_eq!(
            render_side_by_side(&doc),
            "<table><tr><th>Source</th><th>Translation</th></tr>\
             <tr><td>Hello.</td><td class=\"syntagma-translation\">Hola.</td></tr></table>"
        );
    }

    #[test]
    fn test_dialog_rows_are_tagged() {
        let doc = BilingualDocument::new(vec![Paragraph::new(vec![
            Syntagma::new("He said.", "Él dijo."),
            Syntagma::new("-- Go away!", "¡Vete!"),
            Syntagma::new("-- and stay", "y quédate"),
        ])]);
        let html = render_side_by_side(&doc);
        assert_eq!(html.matches("class=\"dialog-line\"").count(), 1);
        assert!(html.contains("<tr class=\"dialog-line\"><td>-- Go away!</td>"));
        assert!(!html.contains("<br>"));
    }

    #[test]
    fn test_dialog_state_resets_per_paragraph() {
        let doc = BilingualDocument::new(vec![
            Paragraph::new(vec![Syntagma::new("The end,", "El fin,")]),
            Paragraph::new(vec![Syntagma::new("— Hi", "— Hola")]),
        ]);
        let html = render_side_by_side(&doc);
        assert!(html.contains("<tr class=\"dialog-line\"><td>— Hi</td>"));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(render_side_by_side(&BilingualDocument::default()), "");
    }
}
