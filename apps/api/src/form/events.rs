//! UI events as commands.
//!
//! Every interaction the page can trigger is a `FormEvent`. A `FormSession`
//! applies it synchronously and returns an `EventOutcome`; nothing here knows
//! about HTTP or the DOM.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::form::counter::CharCounter;
use crate::form::export::{export_filename, render_export};
use crate::form::preview::PreviewState;
use crate::form::tags::{TagAdd, TagListManager};
use crate::form::theme::Theme;
use crate::form::validation::{FieldSnapshot, FormData, ValidationResult, Validator};

/// Receives the normalized bundle after a successful validation.
pub trait SubmitAction: Send + Sync {
    fn submit(&self, data: &FormData);
}

/// Default submit action: there is no backend to hand the data to, so the
/// submission is only logged.
pub struct LogSubmitAction;

impl SubmitAction for LogSubmitAction {
    fn submit(&self, data: &FormData) {
        info!(
            skills = data.skills.len(),
            message_chars = data.message.chars().count(),
            "Profile form submitted"
        );
        debug!(name = %data.name, email = %data.email, age = data.age, "Submitted fields");
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    AddTag { raw: String },
    /// Negative indexes are out of range and remove nothing.
    RemoveTag { index: i64 },
    Submit(FieldSnapshot),
    Reset,
    ToggleTheme,
    CountChars { message: String },
    Export(FieldSnapshot),
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitReport {
    pub summary: String,
    #[serde(flatten)]
    pub result: ValidationResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventOutcome {
    TagAdded {
        outcome: TagAdd,
        clear_input: bool,
        skills: Vec<String>,
    },
    TagRemoved {
        removed: Option<String>,
        skills: Vec<String>,
    },
    Submitted(SubmitReport),
    Reset,
    ThemeChanged {
        theme: Theme,
    },
    Counted(CharCounter),
    Exported {
        filename: String,
        body: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub skills: Vec<String>,
    pub preview: PreviewState,
    pub theme: Theme,
    pub message_limit: usize,
    pub last_result: Option<ValidationResult>,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
}

/// State behind one open form page.
pub struct FormSession {
    tags: TagListManager<PreviewState>,
    theme: Theme,
    validator: Validator,
    submit_action: Arc<dyn SubmitAction>,
    last_result: Option<ValidationResult>,
    created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl FormSession {
    pub fn opened_at(
        validator: Validator,
        submit_action: Arc<dyn SubmitAction>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            tags: TagListManager::new(PreviewState::default()),
            theme: Theme::default(),
            validator,
            submit_action,
            last_result: None,
            created_at: now,
            last_active: now,
        }
    }

    /// Records page activity; idle sessions are expired by the store.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_active = now;
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    pub fn dispatch(&mut self, event: FormEvent) -> EventOutcome {
        match event {
            FormEvent::AddTag { raw } => {
                let outcome = self.tags.add(&raw);
                debug!(?outcome, count = self.tags.tags().len(), "Add tag");
                EventOutcome::TagAdded {
                    clear_input: outcome.clears_input(),
                    outcome,
                    skills: self.tags.to_vec(),
                }
            }
            FormEvent::RemoveTag { index } => {
                let removed = usize::try_from(index)
                    .ok()
                    .and_then(|i| self.tags.remove_at(i));
                debug!(index, removed = removed.is_some(), "Remove tag");
                EventOutcome::TagRemoved {
                    removed,
                    skills: self.tags.to_vec(),
                }
            }
            FormEvent::Submit(snapshot) => EventOutcome::Submitted(self.submit(&snapshot)),
            FormEvent::Reset => {
                self.tags.clear();
                self.last_result = None;
                debug!("Form reset");
                EventOutcome::Reset
            }
            FormEvent::ToggleTheme => {
                self.theme = self.theme.toggle();
                EventOutcome::ThemeChanged { theme: self.theme }
            }
            FormEvent::CountChars { message } => EventOutcome::Counted(CharCounter::measure(
                &message,
                self.validator.message_max_chars(),
            )),
            FormEvent::Export(snapshot) => EventOutcome::Exported {
                filename: export_filename(Utc::now()),
                body: render_export(&snapshot, self.tags.tags().as_slice()),
            },
        }
    }

    fn submit(&mut self, snapshot: &FieldSnapshot) -> SubmitReport {
        let result = self
            .validator
            .validate(snapshot, self.tags.tags().as_slice());

        match &result.data {
            Some(data) => self.submit_action.submit(data),
            None => debug!(failed = ?result.failed_fields(), "Form validation failed"),
        }

        self.last_result = Some(result.clone());
        SubmitReport {
            summary: result.summary(),
            result,
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            skills: self.tags.to_vec(),
            preview: self.tags.observer().clone(),
            theme: self.theme,
            message_limit: self.validator.message_max_chars(),
            last_result: self.last_result.clone(),
            created_at: self.created_at,
            last_active: self.last_active,
        }
    }
}
