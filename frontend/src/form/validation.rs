use std::collections::BTreeMap;

use super::config::SubmissionConfig;

pub const EMAIL_FIELD: &str = "email";
pub const MESSAGE_FIELD: &str = "message";
pub const NAME_FIELD: &str = "name";
pub const PHONE_FIELD: &str = "phone";
pub const MIN_MESSAGE_LENGTH: usize = 10;

pub const INVALID_EMAIL: &str = "Please enter a valid email address";
pub const SHORT_MESSAGE: &str = "Message must be at least 10 characters long";

/// Snapshot of a form's named field values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Value of `name` when present and non-empty (untrimmed).
    fn supplied(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormFields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Checks `fields` against the configured rules and returns every violation,
/// required fields first (in list order), then email format, then message length.
pub fn validate(config: &SubmissionConfig, fields: &FormFields) -> Vec<String> {
    let mut errors = Vec::new();

    for field in &config.required_fields {
        let blank = fields.get(field).map_or(true, |value| value.trim().is_empty());
        if blank {
            errors.push(format!("{} is required", capitalize(field)));
        }
    }

    if let Some(email) = fields.supplied(EMAIL_FIELD) {
        if !config.email_rule.matches(email) {
            errors.push(INVALID_EMAIL.to_string());
        }
    }

    // Length is in characters, not UTF-16 units: five emoji are five characters.
    if let Some(message) = fields.supplied(MESSAGE_FIELD) {
        if message.trim().chars().count() < MIN_MESSAGE_LENGTH {
            errors.push(SHORT_MESSAGE.to_string());
        }
    }

    errors
}

pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
