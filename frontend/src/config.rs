use log::Level;

use crate::form::{DeliveryCredentials, SubmissionConfig};

pub const CONTENT_PATH: &str = "./json/app.json";

pub const RECIPIENT_EMAIL: &str = "femithetchguy@gmail.com";
pub const CONTACT_FORM_SELECTOR: &str = "#contactForm";

// EmailJS identifiers are public and ship with the page.
pub const EMAILJS_SERVICE_ID: &str = "service_fttg_gmail";
pub const EMAILJS_TEMPLATE_ID: &str = "template_fttg";
pub const EMAILJS_PUBLIC_KEY: &str = "ANmN0gWxEnEHgUCXx";

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug  // Verbose logging when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}

pub fn contact_form_config() -> SubmissionConfig {
    SubmissionConfig {
        recipient: RECIPIENT_EMAIL.to_string(),
        form_selector: CONTACT_FORM_SELECTOR.to_string(),
        credentials: DeliveryCredentials::new(
            EMAILJS_SERVICE_ID,
            EMAILJS_TEMPLATE_ID,
            EMAILJS_PUBLIC_KEY,
        ),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_form_is_fully_configured() {
        let config = contact_form_config();
        assert!(config.credentials.missing().is_empty());
        assert_eq!(config.form_selector, "#contactForm");
        assert_eq!(config.required_fields, vec!["name", "email", "message"]);
    }
}
