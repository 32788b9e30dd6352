use std::time::Duration;

/// Success notices remove themselves after this long. Error notices stay
/// until the visitor closes them.
pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_secs(6);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One outcome message for the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub auto_dismiss: Option<Duration>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
            auto_dismiss: Some(SUCCESS_DISMISS_AFTER),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            auto_dismiss: None,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "Message Sent Successfully! ✓",
            NoticeKind::Error => "Error Sending Message",
        }
    }

    pub fn alert_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "border-0 shadow-lg alert alert-success alert-dismissible fade show",
            NoticeKind::Error => "border-0 shadow-lg alert alert-danger alert-dismissible fade show",
        }
    }

    pub fn icon_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "bi bi-check-circle-fill me-3",
            NoticeKind::Error => "bi bi-exclamation-circle-fill me-3",
        }
    }
}

struct Alert<H> {
    id: String,
    notice: Notice,
    handle: Option<H>,
}

/// Notices currently shown above a form, oldest first.
///
/// The stack does not exist until the first notice is pushed. Repeated
/// notices are kept side by side; nothing is merged or capped. Each alert can
/// own a handle (its close listener in the browser) that is given back when
/// the alert is dismissed.
pub struct AlertStack<H = ()> {
    alerts: Option<Vec<Alert<H>>>,
    next_id: u64,
}

impl<H> Default for AlertStack<H> {
    fn default() -> Self {
        Self {
            alerts: None,
            next_id: 0,
        }
    }
}

impl<H> AlertStack<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the container has been created yet.
    pub fn is_created(&self) -> bool {
        self.alerts.is_some()
    }

    /// Appends `notice` and returns the element id assigned to it.
    pub fn push(&mut self, notice: Notice) -> String {
        self.next_id += 1;
        let id = format!("form-alert-{}", self.next_id);
        self.alerts.get_or_insert_with(Vec::new).push(Alert {
            id: id.clone(),
            notice,
            handle: None,
        });
        id
    }

    /// Hands `handle` to the alert with `id`. Gives it back if the alert is
    /// already gone.
    pub fn attach(&mut self, id: &str, handle: H) -> Result<(), H> {
        match self.alerts.iter_mut().flatten().find(|alert| alert.id == id) {
            Some(alert) => {
                alert.handle = Some(handle);
                Ok(())
            }
            None => Err(handle),
        }
    }

    /// Removes the alert with `id` and returns whatever handle it owned.
    /// Returns `None` if it was already gone.
    pub fn dismiss(&mut self, id: &str) -> Option<Option<H>> {
        let alerts = self.alerts.as_mut()?;
        let index = alerts.iter().position(|alert| alert.id == id)?;
        Some(alerts.remove(index).handle)
    }

    pub fn len(&self) -> usize {
        self.alerts.as_ref().map_or(0, Vec::len)
    }

    pub fn notices(&self) -> impl Iterator<Item = &Notice> {
        self.alerts.iter().flatten().map(|alert| &alert.notice)
    }
}
