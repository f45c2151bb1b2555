use super::escape_html;
use crate::document::Question;
use crate::questions::{answer_id, COLLAPSED_LABEL};

/// Render the collapsible question list.
///
/// Every item pairs a toggle control (labelled `+`) with an answer panel that
/// starts hidden. Both the question text and the control carry the answer id
/// in `data-target`, so clicking either toggles the same panel. An absent or
/// empty list renders as an empty string, with no `Questions` header.
pub fn render_questions(entries: Option<&[Question]>) -> String {
    let entries = match entries {
        Some(entries) if !entries.is_empty() => entries,
        _ => return String::new(),
    };

    let mut html = String::from(
        "<div class=\"questions-section\" id=\"questions-container\">\
         <h2>Questions</h2><ul class=\"questions-list\">",
    );
    for (i, entry) in entries.iter().enumerate() {
        let target = answer_id(i);
        html.push_str(&format!(
            "<li class=\"question-item\">\
             <div class=\"question\" data-target=\"{target}\">\
             <span class=\"question-text\">{question}</span>\
             <button class=\"toggle-answer\" data-target=\"{target}\">{label}</button>\
             </div>\
             <div id=\"{target}\" class=\"answer\" style=\"display:none\">{answer}</div>\
             </li>",
            target = target,
            question = escape_html(&entry.question),
            label = COLLAPSED_LABEL,
            answer = escape_html(&entry.answer),
        ));
    }
    html.push_str("</ul></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(q: &str, a: &str) -> Question {
        Question {
            question: q.to_string(),
            answer: a.to_string(),
        }
    }

    #[test]
    fn test_absent_and_empty() {
        assert_eq!(render_questions(None), "");
        let html = render_questions(Some(&[] as &[Question]));
        assert_eq!(html, "");
        assert!(!html.contains("<h2>Questions</h2>"));
    }

    #[test]
    fn test_one_item_per_question_in_order() {
        let entries = vec![question("Who?", "Him."), question("Where?", "Here.")];
        let html = render_questions(Some(entries.as_slice()));
        assert_eq!(html.matches("<li class=\"question-item\">").count(), 2);
        assert!(html.find("Who?").unwrap() < html.find("Where?").unwrap());
        assert!(html.contains("<div id=\"answer-0\" class=\"answer\" style=\"display:none\">Him.</div>"));
        assert!(html.contains("<div id=\"answer-1\" class=\"answer\" style=\"display:none\">Here.</div>"));
    }

    #[test]
    fn test_label_and_control_share_target() {
        let entries = vec![question("Why?", "Because.")];
        let html = render_questions(Some(entries.as_slice()));
        assert!(html.contains("<div class=\"question\" data-target=\"answer-0\">"));
        assert!(html.contains("<button class=\"toggle-answer\" data-target=\"answer-0\">+</button>"));
    }
}
