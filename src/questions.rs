//! Visibility model for a rendered question list.
//!
//! Each answer starts hidden behind a `+` control. Toggling an entry flips
//! only that entry; clicking the question text or the control is the same
//! action. The page script produced by [`toggle_script`] implements the same
//! rules in the browser.

/// Label of the control while the answer is hidden.
pub const COLLAPSED_LABEL: &str = "+";
/// Label of the control while the answer is shown.
pub const EXPANDED_LABEL: &str = "-";

const ANSWER_ID_PREFIX: &str = "answer-";

/// Element id of the answer panel for question `index`.
pub fn answer_id(index: usize) -> String {
    format!("{}{}", ANSWER_ID_PREFIX, index)
}

/// Per-entry answer visibility for one rendered question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionPanel {
    visible: Vec<bool>,
}

impl QuestionPanel {
    /// A panel with `count` entries, all collapsed.
    pub fn new(count: usize) -> Self {
        Self {
            visible: vec![false; count],
        }
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Current label of the control for `index`.
    pub fn label(&self, index: usize) -> &'static str {
        if self.is_visible(index) {
            EXPANDED_LABEL
        } else {
            COLLAPSED_LABEL
        }
    }

    /// Flip the answer of `index`. Returns the new visibility, or `None` for
    /// an index outside the list.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let state = self.visible.get_mut(index)?;
        *state = !*state;
        Some(*state)
    }
}

/// Browser-side toggle handler for markup produced by
/// [`render_questions`](crate::render::render_questions).
pub fn toggle_script() -> String {
    format!(
        r#"<script>
document.addEventListener('click', function (event) {{
    var item = event.target.closest('.question');
    if (!item) return;
    var answer = document.getElementById(item.getAttribute('data-target'));
    var button = item.querySelector('.toggle-answer');
    if (!answer || !button) return;
    var hidden = answer.style.display === 'none' || !answer.style.display;
    answer.style.display = hidden ? 'block' : 'none';
    button.textContent = hidden ? '{expanded}' : '{collapsed}';
}});
</script>"#,
        expanded = EXPANDED_LABEL,
        collapsed = COLLAPSED_LABEL
    )
}
