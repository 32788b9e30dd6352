use async_trait::async_trait;
use gloo_net::http::Request;
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use super::config::DeliveryCredentials;
use super::validation::{FormFields, EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD, PHONE_FIELD};

pub const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";
pub const PHONE_PLACEHOLDER: &str = "Not provided";

/// Template variables handed to the email template.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams {
    pub to_email: String,
    pub from_name: String,
    pub from_email: String,
    pub phone: String,
    pub message: String,
    pub reply_to: String,
}

impl TemplateParams {
    pub fn from_fields(recipient: &str, fields: &FormFields) -> Self {
        let field = |name: &str| fields.get(name).unwrap_or_default().to_string();
        let email = field(EMAIL_FIELD);
        let phone = fields
            .get(PHONE_FIELD)
            .filter(|p| !p.is_empty())
            .unwrap_or(PHONE_PLACEHOLDER)
            .to_string();

        Self {
            to_email: recipient.to_string(),
            from_name: field(NAME_FIELD),
            from_email: email.clone(),
            phone,
            message: field(MESSAGE_FIELD),
            reply_to: email,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub status: u16,
    pub text: String,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("EmailJS is not configured (missing {}). Please refresh the page.", .missing.join(", "))]
    NotConfigured { missing: Vec<&'static str> },
    #[error("EmailJS error: {0}")]
    Transport(String),
    #[error("EmailJS error: {reason}")]
    Rejected { status: u16, reason: String },
}

impl DeliveryError {
    /// Text shown to the visitor: the reported reason, or `fallback` when the
    /// collaborator gave none.
    pub fn user_message(&self, fallback: &str) -> String {
        let reason = match self {
            DeliveryError::NotConfigured { .. } => return self.to_string(),
            DeliveryError::Transport(reason) => reason,
            DeliveryError::Rejected { reason, .. } => reason,
        };
        if reason.trim().is_empty() {
            fallback.to_string()
        } else {
            self.to_string()
        }
    }
}

/// The message relay a form hands accepted submissions to.
#[async_trait(?Send)]
pub trait Delivery {
    async fn send(
        &self,
        credentials: &DeliveryCredentials,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryError>;
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a TemplateParams,
}

/// EmailJS REST relay.
#[derive(Debug, Clone)]
pub struct EmailJs {
    endpoint: String,
}

impl EmailJs {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into() }
    }
}

impl Default for EmailJs {
    fn default() -> Self {
        Self::new(EMAILJS_SEND_URL)
    }
}

#[async_trait(?Send)]
impl Delivery for EmailJs {
    async fn send(
        &self,
        credentials: &DeliveryCredentials,
        params: &TemplateParams,
    ) -> Result<DeliveryReceipt, DeliveryError> {
        let (service_id, template_id, public_key) = match (
            credentials.service_id.as_deref(),
            credentials.template_id.as_deref(),
            credentials.public_key.as_deref(),
        ) {
            (Some(s), Some(t), Some(k)) if credentials.missing().is_empty() => (s, t, k),
            _ => {
                return Err(DeliveryError::NotConfigured {
                    missing: credentials.missing(),
                })
            }
        };

        debug!("Sending contact form via EmailJS service {}", service_id);
        let request = Request::post(&self.endpoint)
            .json(&SendRequest {
                service_id,
                template_id,
                user_id: public_key,
                template_params: params,
            })
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        let ok = response.ok();
        let text = response.text().await.unwrap_or_default();

        if ok {
            info!("Email sent successfully: {} {}", status, text);
            Ok(DeliveryReceipt { status, text })
        } else {
            Err(DeliveryError::Rejected { status, reason: text })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_follow_the_fixed_mapping() {
        let fields: FormFields = [
            ("name", "Dana"),
            ("email", "dana@example.com"),
            ("phone", "555-0100"),
            ("message", "Need a quote for Friday."),
        ]
        .into_iter()
        .collect();

        let params = TemplateParams::from_fields("ops@example.com", &fields);
        assert_eq!(
            params,
            TemplateParams {
                to_email: "ops@example.com".into(),
                from_name: "Dana".into(),
                from_email: "dana@example.com".into(),
                phone: "555-0100".into(),
                message: "Need a quote for Friday.".into(),
                reply_to: "dana@example.com".into(),
            }
        );
    }

    #[test]
    fn blank_phone_uses_placeholder() {
        let fields: FormFields = [("name", "Dana"), ("phone", "")].into_iter().collect();
        assert_eq!(TemplateParams::from_fields("x", &fields).phone, PHONE_PLACEHOLDER);

        let no_phone: FormFields = [("name", "Dana")].into_iter().collect();
        assert_eq!(TemplateParams::from_fields("x", &no_phone).phone, PHONE_PLACEHOLDER);
    }

    #[test]
    fn request_body_matches_emailjs_shape() {
        let params = TemplateParams::from_fields("ops@example.com", &FormFields::new());
        let body = serde_json::to_value(SendRequest {
            service_id: "service_a",
            template_id: "template_b",
            user_id: "key_c",
            template_params: &params,
        })
        .unwrap();

        assert_eq!(body["service_id"], "service_a");
        assert_eq!(body["user_id"], "key_c");
        assert_eq!(body["template_params"]["to_email"], "ops@example.com");
        assert_eq!(body["template_params"]["phone"], PHONE_PLACEHOLDER);
    }

    #[test]
    fn user_message_prefers_reported_reason() {
        let rejected = DeliveryError::Rejected {
            status: 400,
            reason: "The template ID is invalid".into(),
        };
        assert_eq!(rejected.user_message("fallback"), "EmailJS error: The template ID is invalid");

        let silent = DeliveryError::Rejected { status: 500, reason: "  ".into() };
        assert_eq!(silent.user_message("fallback"), "fallback");

        let unconfigured = DeliveryError::NotConfigured { missing: vec!["public key"] };
        assert!(unconfigured.user_message("fallback").contains("missing public key"));
    }
}
