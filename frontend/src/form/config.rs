use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_RECIPIENT: &str = "femithetchguy@gmail.com";
pub const DEFAULT_FORM_SELECTOR: &str = "form[name=\"contactForm\"]";
pub const DEFAULT_SUBMIT_SELECTOR: &str = "button[type=\"submit\"]";
pub const DEFAULT_REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];
pub const DEFAULT_SUCCESS_COPY: &str = "We'll get back to you soon.";
pub const DEFAULT_ERROR_COPY: &str = "Failed to send message. Please try again.";

pub const SENDING_TEXT: &str = "Sending...";
const SENDING_SPINNER: &str =
    r#"<span class="spinner-border spinner-border-sm me-2"></span>Sending..."#;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Format rule applied to the `email` field.
#[derive(Debug, Clone)]
pub struct EmailRule(Regex);

impl EmailRule {
    pub fn new(pattern: Regex) -> Self {
        Self(pattern)
    }

    pub fn matches(&self, email: &str) -> bool {
        self.0.is_match(email)
    }
}

impl Default for EmailRule {
    fn default() -> Self {
        Self(EMAIL_PATTERN.clone())
    }
}

/// EmailJS identifiers. All three are needed to send.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryCredentials {
    pub service_id: Option<String>,
    pub template_id: Option<String>,
    pub public_key: Option<String>,
}

impl DeliveryCredentials {
    pub fn new(service_id: &str, template_id: &str, public_key: &str) -> Self {
        Self {
            service_id: Some(service_id.to_string()),
            template_id: Some(template_id.to_string()),
            public_key: Some(public_key.to_string()),
        }
    }

    /// Names of the identifiers that are absent or blank.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("service id", &self.service_id),
            ("template id", &self.template_id),
            ("public key", &self.public_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}

/// What the submit control shows while a submission is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendingLabel {
    /// Markup with a spinner, written as inner HTML.
    Spinner(&'static str),
    /// Plain text.
    Text(&'static str),
}

/// Settings for one form helper. Built once and never mutated.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub recipient: String,
    pub form_selector: String,
    pub submit_selector: String,
    pub credentials: DeliveryCredentials,
    pub required_fields: Vec<String>,
    pub email_rule: EmailRule,
    pub show_loading_spinner: bool,
    pub success_copy: String,
    pub error_copy: String,
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            recipient: DEFAULT_RECIPIENT.to_string(),
            form_selector: DEFAULT_FORM_SELECTOR.to_string(),
            submit_selector: DEFAULT_SUBMIT_SELECTOR.to_string(),
            credentials: DeliveryCredentials::default(),
            required_fields: DEFAULT_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
            email_rule: EmailRule::default(),
            show_loading_spinner: true,
            success_copy: DEFAULT_SUCCESS_COPY.to_string(),
            error_copy: DEFAULT_ERROR_COPY.to_string(),
        }
    }
}

impl SubmissionConfig {
    pub fn sending_label(&self) -> SendingLabel {
        if self.show_loading_spinner {
            SendingLabel::Spinner(SENDING_SPINNER)
        } else {
            SendingLabel::Text(SENDING_TEXT)
        }
    }
}
