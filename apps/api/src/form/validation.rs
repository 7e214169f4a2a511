use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub const NAME_MIN_CHARS: usize = 2;
pub const AGE_MIN: f64 = 18.0;
pub const AGE_MAX: f64 = 99.0;
pub const MESSAGE_MIN_CHARS: usize = 20;

/// Raw field text as typed, captured at validation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSnapshot {
    pub name: String,
    pub email: String,
    pub age: String,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldId {
    Name,
    Email,
    Age,
    Message,
}

impl FieldId {
    pub const ALL: [FieldId; 4] = [FieldId::Name, FieldId::Email, FieldId::Age, FieldId::Message];
}

/// One entry per field: the error message, or an empty string when the field passed.
pub type FieldErrors = BTreeMap<FieldId, String>;

/// Normalized bundle, produced only when every field passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub name: String,
    pub email: String,
    pub age: u8,
    pub message: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: FieldErrors,
    pub data: Option<FormData>,
}

impl ValidationResult {
    pub fn error(&self, field: FieldId) -> Option<&str> {
        self.errors
            .get(&field)
            .map(String::as_str)
            .filter(|m| !m.is_empty())
    }

    pub fn failed_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|f| self.error(*f).is_some())
            .collect()
    }

    pub fn summary(&self) -> String {
        if self.valid {
            return "Form submitted successfully!".to_string();
        }
        let failed = self.failed_fields().len();
        format!(
            "Please fix the {} highlighted field{} before submitting.",
            failed,
            if failed == 1 { "" } else { "s" }
        )
    }
}

fn email_pattern() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Checks a snapshot field by field. Every field is checked even after an
/// earlier failure so all errors can be shown at once.
#[derive(Debug, Clone)]
pub struct Validator {
    message_max_chars: usize,
}

impl Validator {
    pub fn new(message_max_chars: usize) -> Self {
        Self { message_max_chars }
    }

    pub fn message_max_chars(&self) -> usize {
        self.message_max_chars
    }

    pub fn validate(&self, snapshot: &FieldSnapshot, skills: &[String]) -> ValidationResult {
        let name = snapshot.name.trim();
        let email = snapshot.email.trim();
        let message = snapshot.message.trim();
        let age = parse_age(&snapshot.age);

        let mut errors = FieldErrors::new();
        errors.insert(FieldId::Name, check_name(name));
        errors.insert(FieldId::Email, check_email(email));
        errors.insert(
            FieldId::Age,
            match age {
                Some(_) => String::new(),
                None => format!(
                    "Please enter a valid age between {} and {}.",
                    AGE_MIN, AGE_MAX
                ),
            },
        );
        errors.insert(FieldId::Message, self.check_message(message));

        let valid = errors.values().all(String::is_empty);
        let data = match (valid, age) {
            (true, Some(age)) => Some(FormData {
                name: name.to_string(),
                email: email.to_string(),
                age,
                message: message.to_string(),
                skills: skills.to_vec(),
            }),
            _ => None,
        };

        ValidationResult {
            valid,
            errors,
            data,
        }
    }

    fn check_message(&self, message: &str) -> String {
        let len = message.chars().count();
        if len < MESSAGE_MIN_CHARS {
            format!("Bio must be at least {} characters.", MESSAGE_MIN_CHARS)
        } else if len > self.message_max_chars {
            format!("Bio must be at most {} characters.", self.message_max_chars)
        } else {
            String::new()
        }
    }
}

fn check_name(name: &str) -> String {
    if name.is_empty() {
        "Name is required.".to_string()
    } else if name.chars().count() < NAME_MIN_CHARS {
        format!("Name must be at least {} characters.", NAME_MIN_CHARS)
    } else {
        String::new()
    }
}

fn check_email(email: &str) -> String {
    if email.is_empty() {
        "Email is required.".to_string()
    } else if !email_pattern().is_match(email) {
        "Please enter a valid email address.".to_string()
    } else {
        String::new()
    }
}

/// Parses age text numerically. Fractions are accepted and truncated; anything
/// unparseable, NaN or outside [18, 99] yields `None`.
fn parse_age(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let value: f64 = raw.parse().ok()?;
    if value.is_nan() || !(AGE_MIN..=AGE_MAX).contains(&value) {
        return None;
    }
    Some(value.trunc() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BIO: &str = "I enjoy building tools!!!"; // 25 chars

    fn snapshot(name: &str, email: &str, age: &str, message: &str) -> FieldSnapshot {
        FieldSnapshot {
            name: name.to_string(),
            email: email.to_string(),
            age: age.to_string(),
            message: message.to_string(),
        }
    }

    fn good() -> FieldSnapshot {
        snapshot("Jane Doe", "jane@example.com", "30", BIO)
    }

    fn validator() -> Validator {
        Validator::new(500)
    }

    #[test]
    fn test_short_name_always_fails() {
        let r = validator().validate(&snapshot("A", "jane@example.com", "30", BIO), &[]);
        assert!(!r.valid);
        assert!(r.error(FieldId::Name).is_some());
        assert_eq!(r.failed_fields(), vec![FieldId::Name]);

        let r = validator().validate(&snapshot("A", "", "", ""), &[]);
        assert!(r.error(FieldId::Name).is_some());
    }

    #[test]
    fn test_name_is_trimmed_before_length_check() {
        let r = validator().validate(&snapshot("  A  ", "a@b.c", "30", BIO), &[]);
        assert!(r.error(FieldId::Name).is_some());
    }

    #[test]
    fn test_age_bounds() {
        for bad in ["17", "100", "abc", "", "   ", "NaN"] {
            let mut s = good();
            s.age = bad.to_string();
            let r = validator().validate(&s, &[]);
            assert!(r.error(FieldId::Age).is_some(), "age {bad:?} should fail");
        }
        for ok in ["18", "99", " 42 "] {
            let mut s = good();
            s.age = ok.to_string();
            let r = validator().validate(&s, &[]);
            assert!(r.error(FieldId::Age).is_none(), "age {ok:?} should pass");
        }
    }

    #[test]
    fn test_fractional_age_is_truncated() {
        let mut s = good();
        s.age = "30.7".to_string();
        let r = validator().validate(&s, &[]);
        assert_eq!(r.data.map(|d| d.age), Some(30));
    }

    #[test]
    fn test_email_pattern() {
        for ok in ["a@b.c", "jane.doe@mail.example.org"] {
            let mut s = good();
            s.email = ok.to_string();
            assert!(validator().validate(&s, &[]).error(FieldId::Email).is_none());
        }
        for bad in ["a@b", "a@@b.c", "a b@c.d", "", "@b.c", "a@.c"] {
            let mut s = good();
            s.email = bad.to_string();
            assert!(
                validator().validate(&s, &[]).error(FieldId::Email).is_some(),
                "email {bad:?} should fail"
            );
        }
    }

    #[test]
    fn test_message_length_floor() {
        let mut s = good();
        s.message = format!("  {}  ", "x".repeat(20));
        assert!(validator().validate(&s, &[]).error(FieldId::Message).is_none());

        s.message = "x".repeat(19);
        assert!(validator().validate(&s, &[]).error(FieldId::Message).is_some());
    }

    #[test]
    fn test_message_errors_are_fixed_text() {
        let mut s = good();
        s.message = "x".repeat(5);
        let short = validator().validate(&s, &[]);
        s.message = "x".repeat(12);
        let shorter = validator().validate(&s, &[]);
        assert_eq!(short.error(FieldId::Message), shorter.error(FieldId::Message));
        assert_eq!(
            short.error(FieldId::Message),
            Some("Bio must be at least 20 characters.")
        );

        s.message = "x".repeat(501);
        assert_eq!(
            validator().validate(&s, &[]).error(FieldId::Message),
            Some("Bio must be at most 500 characters.")
        );
    }

    #[test]
    fn test_message_length_ceiling() {
        let v = Validator::new(30);
        let mut s = good();
        s.message = "x".repeat(30);
        assert!(v.validate(&s, &[]).error(FieldId::Message).is_none());
        s.message = "x".repeat(31);
        assert!(v.validate(&s, &[]).error(FieldId::Message).is_some());
    }

    #[test]
    fn test_all_errors_reported_together() {
        let r = validator().validate(&FieldSnapshot::default(), &[]);
        assert!(!r.valid);
        assert!(r.data.is_none());
        assert_eq!(r.failed_fields(), FieldId::ALL.to_vec());
        assert!(r.summary().contains("4 highlighted fields"));
    }

    #[test]
    fn test_valid_snapshot_with_empty_tags() {
        let r = validator().validate(&snapshot("Jane Doe", "jane@example.com", "30", BIO), &[]);
        assert!(r.valid);
        assert!(r.errors.values().all(String::is_empty));
        assert_eq!(r.errors.len(), 4);

        let data = r.data.expect("data on success");
        assert_eq!(data.age, 30);
        assert!(data.skills.is_empty());
    }

    #[test]
    fn test_data_is_trimmed_and_carries_skills() {
        let skills = vec!["Rust".to_string(), "Go".to_string()];
        let s = snapshot(" Jane ", " jane@example.com ", "30", &format!("  {BIO}  "));
        let data = validator().validate(&s, &skills).data.unwrap();
        assert_eq!(data.name, "Jane");
        assert_eq!(data.email, "jane@example.com");
        assert_eq!(data.message, BIO);
        assert_eq!(data.skills, skills);
    }

    #[test]
    fn test_summary_singular() {
        let mut s = good();
        s.age = "5".to_string();
        assert_eq!(
            validator().validate(&s, &[]).summary(),
            "Please fix the 1 highlighted field before submitting."
        );
    }
}
