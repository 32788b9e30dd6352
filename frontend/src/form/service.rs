use std::cell::Cell;

use log::{error, info, warn};
use thiserror::Error;

use super::config::{SendingLabel, SubmissionConfig};
use super::delivery::{Delivery, DeliveryError, DeliveryReceipt, TemplateParams};
use super::notice::Notice;
use super::validation::{validate, FormFields};

/// The parts of a bound form the helper reads and drives.
pub trait FormSurface {
    fn field_values(&self) -> FormFields;
    /// Disable the submit control and show `label` on it.
    fn enter_sending(&self, label: SendingLabel);
    /// Re-enable the submit control and restore its original label.
    fn leave_sending(&self);
    fn reset_fields(&self);
    fn show_notice(&self, notice: Notice);
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{}", .0.join("\n"))]
    Validation(Vec<String>),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
    #[error("a submission is already in progress")]
    InFlight,
}

/// Outcome of one submit attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionResult {
    pub accepted: bool,
    pub validation_errors: Vec<String>,
    pub delivery_error: Option<String>,
}

impl SubmissionResult {
    fn accepted() -> Self {
        Self {
            accepted: true,
            ..Default::default()
        }
    }
}

impl From<SubmitError> for SubmissionResult {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(errors) => Self {
                validation_errors: errors,
                ..Default::default()
            },
            other => Self {
                delivery_error: Some(other.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Holds the form in its sending state for as long as it lives.
struct SendingGuard<'a, S: FormSurface + ?Sized> {
    in_flight: &'a Cell<bool>,
    surface: &'a S,
}

impl<'a, S: FormSurface + ?Sized> SendingGuard<'a, S> {
    fn enter(in_flight: &'a Cell<bool>, surface: &'a S, label: SendingLabel) -> Option<Self> {
        if in_flight.replace(true) {
            return None;
        }
        surface.enter_sending(label);
        Some(Self { in_flight, surface })
    }
}

impl<S: FormSurface + ?Sized> Drop for SendingGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.leave_sending();
        self.in_flight.set(false);
    }
}

/// Validates a form's fields and relays accepted submissions.
pub struct FormService<D> {
    config: SubmissionConfig,
    delivery: D,
    in_flight: Cell<bool>,
}

impl<D: Delivery> FormService<D> {
    pub fn new(config: SubmissionConfig, delivery: D) -> Self {
        let missing = config.credentials.missing();
        if !missing.is_empty() {
            error!(
                "FormService: missing EmailJS credentials ({}). Check config.",
                missing.join(", ")
            );
        }
        Self {
            config,
            delivery,
            in_flight: Cell::new(false),
        }
    }

    pub fn config(&self) -> &SubmissionConfig {
        &self.config
    }

    pub fn is_sending(&self) -> bool {
        self.in_flight.get()
    }

    pub fn validate(&self, fields: &FormFields) -> Vec<String> {
        validate(&self.config, fields)
    }

    /// Runs one submit attempt against `surface` and reports the outcome to
    /// the visitor through it.
    pub async fn submit<S: FormSurface + ?Sized>(&self, surface: &S) -> SubmissionResult {
        match self.attempt(surface).await {
            Ok(receipt) => {
                info!("Contact form delivered (status {})", receipt.status);
                SubmissionResult::accepted()
            }
            Err(SubmitError::InFlight) => {
                warn!("Ignoring submit while a previous one is still sending");
                SubmitError::InFlight.into()
            }
            Err(e) => e.into(),
        }
    }

    async fn attempt<S: FormSurface + ?Sized>(
        &self,
        surface: &S,
    ) -> Result<DeliveryReceipt, SubmitError> {
        if self.is_sending() {
            return Err(SubmitError::InFlight);
        }

        let fields = surface.field_values();
        let errors = self.validate(&fields);
        if !errors.is_empty() {
            let err = SubmitError::Validation(errors);
            surface.show_notice(Notice::error(err.to_string()));
            return Err(err);
        }

        let _sending = SendingGuard::enter(&self.in_flight, surface, self.config.sending_label())
            .ok_or(SubmitError::InFlight)?;

        let params = TemplateParams::from_fields(&self.config.recipient, &fields);
        match self.delivery.send(&self.config.credentials, &params).await {
            Ok(receipt) => {
                surface.show_notice(Notice::success(self.config.success_copy.clone()));
                surface.reset_fields();
                Ok(receipt)
            }
            Err(e) => {
                error!("Form submission error: {}", e);
                surface.show_notice(Notice::error(e.user_message(&self.config.error_copy)));
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;

    use super::*;
    use crate::form::config::DeliveryCredentials;
    use crate::form::notice::NoticeKind;

    #[derive(Default)]
    struct RecordingSurface {
        fields: RefCell<FormFields>,
        sending: Cell<bool>,
        label: RefCell<Option<SendingLabel>>,
        notices: RefCell<Vec<Notice>>,
        resets: Cell<usize>,
    }

    impl RecordingSurface {
        fn with(fields: &[(&str, &str)]) -> Rc<Self> {
            let surface = Self::default();
            *surface.fields.borrow_mut() = fields.iter().copied().collect();
            Rc::new(surface)
        }

        fn last_notice(&self) -> Notice {
            self.notices.borrow().last().cloned().expect("a notice was shown")
        }
    }

    impl FormSurface for RecordingSurface {
        fn field_values(&self) -> FormFields {
            self.fields.borrow().clone()
        }

        fn enter_sending(&self, label: SendingLabel) {
            self.sending.set(true);
            *self.label.borrow_mut() = Some(label);
        }

        fn leave_sending(&self) {
            self.sending.set(false);
            *self.label.borrow_mut() = None;
        }

        fn reset_fields(&self) {
            self.resets.set(self.resets.get() + 1);
            *self.fields.borrow_mut() = FormFields::new();
        }

        fn show_notice(&self, notice: Notice) {
            self.notices.borrow_mut().push(notice);
        }
    }

    /// Replies with queued outcomes and records what the form looked like
    /// while each call was in flight.
    #[derive(Default)]
    struct ScriptedDelivery {
        outcomes: RefCell<VecDeque<Result<DeliveryReceipt, DeliveryError>>>,
        observed: RefCell<Option<Rc<RecordingSurface>>>,
        sending_during_call: RefCell<Vec<bool>>,
        sent: RefCell<Vec<TemplateParams>>,
    }

    impl ScriptedDelivery {
        fn replying(outcomes: Vec<Result<DeliveryReceipt, DeliveryError>>) -> Self {
            Self {
                outcomes: RefCell::new(outcomes.into()),
                ..Default::default()
            }
        }

        fn watch(&self, surface: &Rc<RecordingSurface>) {
            *self.observed.borrow_mut() = Some(surface.clone());
        }
    }

    #[async_trait(?Send)]
    impl Delivery for ScriptedDelivery {
        async fn send(
            &self,
            _credentials: &DeliveryCredentials,
            params: &TemplateParams,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            if let Some(surface) = self.observed.borrow().as_ref() {
                self.sending_during_call.borrow_mut().push(surface.sending.get());
            }
            self.sent.borrow_mut().push(params.clone());
            self.outcomes
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(DeliveryError::Transport("no scripted reply".into())))
        }
    }

    fn ok_receipt() -> Result<DeliveryReceipt, DeliveryError> {
        Ok(DeliveryReceipt { status: 200, text: "OK".into() })
    }

    fn service(delivery: ScriptedDelivery) -> FormService<ScriptedDelivery> {
        let config = SubmissionConfig {
            recipient: "dispatch@example.com".into(),
            credentials: DeliveryCredentials::new("service_a", "template_b", "key_c"),
            ..Default::default()
        };
        FormService::new(config, delivery)
    }

    const VALID: [(&str, &str); 3] = [
        ("name", "Dana"),
        ("email", "dana@example.com"),
        ("message", "Need a quote for Friday."),
    ];

    #[test]
    fn successful_delivery_resets_form_and_auto_dismisses() {
        let surface = RecordingSurface::with(&VALID);
        let form = service(ScriptedDelivery::replying(vec![ok_receipt()]));
        form.delivery.watch(&surface);

        assert!(!surface.sending.get());
        let result = block_on(form.submit(&*surface));

        assert_eq!(result, SubmissionResult { accepted: true, ..Default::default() });
        assert_eq!(*form.delivery.sending_during_call.borrow(), vec![true]);
        assert!(!surface.sending.get());
        assert!(!form.is_sending());
        assert_eq!(surface.resets.get(), 1);
        assert_eq!(surface.field_values(), FormFields::new());

        let notice = surface.last_notice();
        assert_eq!(notice.kind, NoticeKind::Success);
        assert_eq!(notice.message, "We'll get back to you soon.");
        assert_eq!(notice.auto_dismiss, Some(Duration::from_secs(6)));
    }

    #[test]
    fn delivery_receives_the_fixed_parameter_mapping() {
        let surface = RecordingSurface::with(&VALID);
        let form = service(ScriptedDelivery::replying(vec![ok_receipt()]));
        block_on(form.submit(&*surface));

        let sent = form.delivery.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_email, "dispatch@example.com");
        assert_eq!(sent[0].reply_to, "dana@example.com");
        assert_eq!(sent[0].phone, "Not provided");
    }

    #[test]
    fn rejected_delivery_shows_reason_and_keeps_fields() {
        let surface = RecordingSurface::with(&VALID);
        let before = surface.field_values();
        let form = service(ScriptedDelivery::replying(vec![Err(DeliveryError::Rejected {
            status: 412,
            reason: "Template not found".into(),
        })]));

        let result = block_on(form.submit(&*surface));

        assert!(!result.accepted);
        assert!(result.validation_errors.is_empty());
        assert_eq!(result.delivery_error.as_deref(), Some("EmailJS error: Template not found"));
        assert_eq!(surface.field_values(), before);
        assert_eq!(surface.resets.get(), 0);
        assert!(!surface.sending.get());

        let notice = surface.last_notice();
        assert_eq!(notice.kind, NoticeKind::Error);
        assert!(notice.message.contains("Template not found"));
        assert_eq!(notice.auto_dismiss, None);
    }

    #[test]
    fn failure_without_reason_uses_configured_copy() {
        let surface = RecordingSurface::with(&VALID);
        let form = service(ScriptedDelivery::replying(vec![Err(DeliveryError::Transport(
            String::new(),
        ))]));

        block_on(form.submit(&*surface));
        assert_eq!(surface.last_notice().message, "Failed to send message. Please try again.");
    }

    #[test]
    fn invalid_fields_never_reach_delivery() {
        let surface = RecordingSurface::with(&[
            ("name", ""),
            ("email", "a@b.com"),
            ("message", "hello there"),
        ]);
        let form = service(ScriptedDelivery::replying(vec![ok_receipt()]));

        let result = block_on(form.submit(&*surface));

        assert_eq!(result.validation_errors, vec!["Name is required"]);
        assert!(form.delivery.sent.borrow().is_empty());
        assert!(surface.label.borrow().is_none());
        assert_eq!(surface.last_notice(), Notice::error("Name is required"));
    }

    #[test]
    fn validation_errors_are_joined_in_one_notice() {
        let surface = RecordingSurface::with(&[("email", "bad"), ("message", "tiny")]);
        let form = service(ScriptedDelivery::default());

        block_on(form.submit(&*surface));

        assert_eq!(surface.notices.borrow().len(), 1);
        assert_eq!(
            surface.last_notice().message,
            "Name is required\nPlease enter a valid email address\nMessage must be at least 10 characters long"
        );
    }

    #[test]
    fn missing_credentials_fail_at_send_time() {
        use crate::form::delivery::EmailJs;

        let surface = RecordingSurface::with(&VALID);
        let form = FormService::new(SubmissionConfig::default(), EmailJs::default());

        let result = block_on(form.submit(&*surface));

        assert!(!result.accepted);
        assert!(result
            .delivery_error
            .unwrap()
            .contains("missing service id, template id, public key"));
        assert!(!surface.sending.get());
    }

    #[test]
    fn sequential_attempts_each_clean_up() {
        let surface = RecordingSurface::with(&VALID);
        let form = service(ScriptedDelivery::replying(vec![
            Err(DeliveryError::Transport("network down".into())),
            ok_receipt(),
        ]));
        form.delivery.watch(&surface);

        let first = block_on(form.submit(&*surface));
        assert!(!first.accepted);
        assert!(!surface.sending.get());

        let second = block_on(form.submit(&*surface));
        assert!(second.accepted);
        assert!(!surface.sending.get());
        assert!(!form.is_sending());

        assert_eq!(*form.delivery.sending_during_call.borrow(), vec![true, true]);
        let kinds: Vec<_> = surface.notices.borrow().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Error, NoticeKind::Success]);
    }

    struct GatedDelivery {
        gate: RefCell<Option<oneshot::Receiver<()>>>,
        calls: Cell<usize>,
    }

    #[async_trait(?Send)]
    impl Delivery for GatedDelivery {
        async fn send(
            &self,
            _credentials: &DeliveryCredentials,
            _params: &TemplateParams,
        ) -> Result<DeliveryReceipt, DeliveryError> {
            self.calls.set(self.calls.get() + 1);
            let gate = self.gate.borrow_mut().take();
            if let Some(gate) = gate {
                gate.await.map_err(|e| DeliveryError::Transport(e.to_string()))?;
            }
            Ok(DeliveryReceipt { status: 200, text: "OK".into() })
        }
    }

    #[test]
    fn second_attempt_while_sending_is_rejected() {
        let (release, gate) = oneshot::channel();
        let surface = RecordingSurface::with(&VALID);
        let form = FormService::new(
            SubmissionConfig {
                credentials: DeliveryCredentials::new("s", "t", "k"),
                ..Default::default()
            },
            GatedDelivery { gate: RefCell::new(Some(gate)), calls: Cell::new(0) },
        );

        let (first, second) = block_on(futures::future::join(form.submit(&*surface), async {
            let second = form.submit(&*surface).await;
            assert!(surface.sending.get());
            release.send(()).unwrap();
            second
        }));

        assert!(first.accepted);
        assert_eq!(
            second,
            SubmissionResult {
                delivery_error: Some("a submission is already in progress".into()),
                ..Default::default()
            }
        );
        assert_eq!(form.delivery.calls.get(), 1);
        assert_eq!(surface.notices.borrow().len(), 1);
        assert!(!surface.sending.get());
    }
}
