use super::escape_html;
use crate::questions::toggle_script;

const STYLE: &str = "<style>\
body{font-family:Georgia,serif;max-width:60em;margin:2em auto;line-height:1.6}\
.syntagma-translation{color:#659;font-size:0.9em}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:0.2em 0.6em}\
tr.dialog-line td{border-top:2px solid #659}\
.question{cursor:pointer}.toggle-answer{margin-left:0.5em}\
</style>";

/// Wrap rendered fragments into a standalone HTML page.
///
/// `lemmas` goes in its own section below the content; the question toggle
/// script is always included.
pub fn render_page(title: &str, content: &str, lemmas: Option<&str>) -> String {
    let mut html = String::from("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str(&format!("<title>{}</title>", escape_html(title)));
    html.push_str(STYLE);
    html.push_str("</head><body>");
    html.push_str(&format!("<div id=\"bilingual-content\">{}</div>", content));
    if let Some(lemmas) = lemmas {
        html.push_str(&format!("<div id=\"lemmas-content\">{}</div>", lemmas));
    }
    html.push_str(&toggle_script());
    html.push_str("</body></html>\n");
    html
}
