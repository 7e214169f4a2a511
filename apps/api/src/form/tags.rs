//! Skill tag list: an ordered set of trimmed, unique labels.
//!
//! The list itself is plain data. `TagListManager` wraps it and pushes every
//! mutation to a `TagObserver`: the rendered list first, then the preview text
//! derived from it. A preview must never be computed from a stale list.

use serde::{Deserialize, Serialize};

/// Outcome of an add request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagAdd {
    Added,
    Empty,
    Duplicate,
}

impl TagAdd {
    /// The input field is cleared after every add, including no-ops.
    pub fn clears_input(&self) -> bool {
        true
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagList {
    items: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Trims `raw` and appends it unless it is empty or already present.
    /// Comparison is exact and case-sensitive.
    pub fn add(&mut self, raw: &str) -> TagAdd {
        let tag = raw.trim();
        if tag.is_empty() {
            return TagAdd::Empty;
        }
        if self.items.iter().any(|t| t == tag) {
            return TagAdd::Duplicate;
        }
        self.items.push(tag.to_string());
        TagAdd::Added
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[String] {
        &self.items
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.items.clone()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Receives the tag list after each mutation.
pub trait TagObserver {
    fn render_list(&mut self, tags: &[String]);
    fn update_preview(&mut self, tags: &[String]);
}

pub struct TagListManager<O> {
    tags: TagList,
    observer: O,
}

impl<O: TagObserver> TagListManager<O> {
    pub fn new(observer: O) -> Self {
        Self {
            tags: TagList::new(),
            observer,
        }
    }

    pub fn add(&mut self, raw: &str) -> TagAdd {
        let outcome = self.tags.add(raw);
        if outcome == TagAdd::Added {
            self.notify();
        }
        outcome
    }

    pub fn remove_at(&mut self, index: usize) -> Option<String> {
        let removed = self.tags.remove_at(index);
        if removed.is_some() {
            self.notify();
        }
        removed
    }

    /// Empties the list. Always redraws, even if it was already empty.
    pub fn clear(&mut self) {
        self.tags.clear();
        self.notify();
    }

    pub fn tags(&self) -> &TagList {
        &self.tags
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.to_vec()
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    fn notify(&mut self) {
        self.observer.render_list(self.tags.as_slice());
        self.observer.update_preview(self.tags.as_slice());
    }
}
