use serde::Serialize;

/// Live character count for the bio field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CharCounter {
    pub used: usize,
    pub limit: usize,
    pub remaining: usize,
    pub over_limit: bool,
}

impl CharCounter {
    /// Counts the raw text as typed (not trimmed).
    pub fn measure(text: &str, limit: usize) -> Self {
        let used = text.chars().count();
        Self {
            used,
            limit,
            remaining: limit.saturating_sub(used),
            over_limit: used > limit,
        }
    }
}
