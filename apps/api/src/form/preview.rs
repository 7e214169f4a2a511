use serde::Serialize;

use crate::form::tags::TagObserver;

pub const SKILLS_PLACEHOLDER: &str = "Skills: none added yet";

/// The "Skills: a, b, c" line shown under the form.
pub fn skills_summary(skills: &[String]) -> String {
    if skills.is_empty() {
        SKILLS_PLACEHOLDER.to_string()
    } else {
        format!("Skills: {}", skills.join(", "))
    }
}

/// What the page currently shows for the tag list, kept in step with every mutation.
#[derive(Debug, Clone, Serialize)]
pub struct PreviewState {
    pub rendered: Vec<String>,
    pub summary: String,
    pub renders: u64,
}

impl Default for PreviewState {
    fn default() -> Self {
        Self {
            rendered: Vec::new(),
            summary: SKILLS_PLACEHOLDER.to_string(),
            renders: 0,
        }
    }
}

impl TagObserver for PreviewState {
    fn render_list(&mut self, tags: &[String]) {
        self.rendered = tags.to_vec();
        self.renders += 1;
    }

    fn update_preview(&mut self, tags: &[String]) {
        self.summary = skills_summary(tags);
    }
}
