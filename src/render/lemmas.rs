use super::escape_html;
use crate::document::LemmaEntry;

/// Render the lemma frequency table.
///
/// Rows keep the order the lemmatize service returned them in. An absent or
/// empty list renders as an empty string.
pub fn render_lemmas(entries: Option<&[LemmaEntry]>) -> String {
    let entries = match entries {
        Some(entries) if !entries.is_empty() => entries,
        _ => return String::new(),
    };

    let mut html = format!(
        "<h2>Lemmas</h2><div><b>Number of lemmas:</b> {}</div><table>\
         <tr><th>Lemma</th><th>Number of Words</th><th>Number of Occurrences</th></tr>",
        entries.len()
    );
    for entry in entries {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&entry.lemma),
            entry.number_of_words,
            entry.number_of_occurrences
        ));
    }
    html.push_str("</table>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(lemma: &str, words: u32, occurrences: u32) -> LemmaEntry {
        LemmaEntry {
            lemma: lemma.to_string(),
            number_of_words: words,
            number_of_occurrences: occurrences,
        }
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(render_lemmas(None), "");
        assert_eq!(render_lemmas(Some(&[] as &[LemmaEntry])), "");
    }

    #[test]
    fn test_header_counts_entries() {
        let entries = vec![entry("ser", 3, 12), entry("gato", 1, 2)];
        let html = render_lemmas(Some(entries.as_slice()));
        assert!(html.starts_with("<h2>Lemmas</h2><div><b>Number of lemmas:</b> 2</div>"));
        assert_eq!(html.matches("<tr><td>").count(), 2);
    }

    #[test]
    fn test_rows_keep_received_order() {
        // deliberately not sorted by occurrences
        let entries = vec![entry("b", 1, 1), entry("a", 2, 9), entry("c", 1, 4)];
        let html = render_lemmas(Some(entries.as_slice()));
        assert!(html.contains(
            "<tr><td>b</td><td>1</td><td>1</td></tr>\
             <tr><td>a</td><td>2</td><td>9</td></tr>\
             <tr><td>c</td><td>1</td><td>4</td></tr></table>"
        ));
    }
}
