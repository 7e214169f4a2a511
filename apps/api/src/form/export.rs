//! Plain-text export of the current form, offered to the browser as a download.

use chrono::{DateTime, Utc};

use crate::form::validation::FieldSnapshot;

const EMPTY: &str = "(empty)";
const NO_SKILLS: &str = "(none)";

/// Renders the line-oriented export document. No trailing newline.
pub fn render_export(snapshot: &FieldSnapshot, skills: &[String]) -> String {
    let skills_line = if skills.is_empty() {
        NO_SKILLS.to_string()
    } else {
        skills.join(", ")
    };

    format!(
        "Name: {}\nEmail: {}\nAge: {}\nSkills: {}\n\n--- Bio ---\n{}",
        or_empty(&snapshot.name),
        or_empty(&snapshot.email),
        or_empty(&snapshot.age),
        skills_line,
        or_empty(&snapshot.message),
    )
}

pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("profile-{}.txt", now.format("%Y%m%d-%H%M%S"))
}

fn or_empty(value: &str) -> &str {
    let value = value.trim();
    if value.is_empty() {
        EMPTY
    } else {
        value
    }
}
