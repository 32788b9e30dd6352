use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use log::{error, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, FormData, HtmlElement, HtmlFormElement, Node};

use super::config::SendingLabel;
use super::delivery::Delivery;
use super::notice::{AlertStack, Notice};
use super::service::{FormService, FormSurface};
use super::validation::{FormFields, EMAIL_FIELD, MESSAGE_FIELD, NAME_FIELD, PHONE_FIELD};

const ALERTS_CLASS: &str = "form-alerts";

type CloseListener = Closure<dyn FnMut(Event)>;

/// A form element in the live document.
struct DomForm {
    document: Document,
    form: HtmlFormElement,
    submit: Option<HtmlElement>,
    original_label: String,
    field_names: Vec<String>,
    alerts: Rc<RefCell<AlertStack<CloseListener>>>,
}

impl DomForm {
    fn alert_container(&self) -> Option<Element> {
        let parent = self.form.parent_element()?;
        if let Ok(Some(existing)) = parent.query_selector(&format!(".{}", ALERTS_CLASS)) {
            return Some(existing);
        }

        let container = self.document.create_element("div").ok()?;
        container.set_class_name(ALERTS_CLASS);
        let anchor: &Node = self.form.as_ref();
        parent.insert_before(&container, Some(anchor)).ok()?;
        Some(container)
    }
}

impl FormSurface for DomForm {
    fn field_values(&self) -> FormFields {
        let Ok(data) = FormData::new_with_form(&self.form) else {
            return FormFields::new();
        };
        self.field_names
            .iter()
            .filter_map(|name| data.get(name).as_string().map(|value| (name.clone(), value)))
            .collect()
    }

    fn enter_sending(&self, label: SendingLabel) {
        let Some(button) = &self.submit else { return };
        let _ = button.set_attribute("disabled", "");
        match label {
            SendingLabel::Spinner(html) => button.set_inner_html(html),
            SendingLabel::Text(text) => button.set_text_content(Some(text)),
        }
    }

    fn leave_sending(&self) {
        let Some(button) = &self.submit else { return };
        let _ = button.remove_attribute("disabled");
        button.set_text_content(Some(&self.original_label));
    }

    fn reset_fields(&self) {
        self.form.reset();
    }

    fn show_notice(&self, notice: Notice) {
        let Some(container) = self.alert_container() else {
            warn!("No place to show form notice: {}", notice.message);
            return;
        };

        let id = self.alerts.borrow_mut().push(notice.clone());
        let alert = match build_alert(&self.document, &id, &notice) {
            Ok(alert) => alert,
            Err(e) => {
                error!("Failed to build form notice: {:?}", e);
                return;
            }
        };

        if let Ok(Some(close)) = alert.query_selector(".btn-close") {
            let dismiss = dismiss_alert(&self.document, &self.alerts, &id);
            let on_close: CloseListener =
                Closure::wrap(Box::new(move |_: Event| dismiss()) as Box<dyn FnMut(Event)>);
            let _ =
                close.add_event_listener_with_callback("click", on_close.as_ref().unchecked_ref());
            if self.alerts.borrow_mut().attach(&id, on_close).is_err() {
                warn!("Form notice {} was dismissed before it was shown", id);
            }
        }

        let _ = container.append_child(&alert);

        if let Some(delay) = notice.auto_dismiss {
            let dismiss = dismiss_alert(&self.document, &self.alerts, &id);
            let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
            Timeout::new(millis, dismiss).forget();
        }
    }
}

fn dismiss_alert(
    document: &Document,
    alerts: &Rc<RefCell<AlertStack<CloseListener>>>,
    id: &str,
) -> impl Fn() + 'static {
    let document = document.clone();
    let alerts = alerts.clone();
    let id = id.to_string();
    move || {
        if let Some(el) = document.get_element_by_id(&id) {
            el.remove();
        }
        let released = alerts.borrow_mut().dismiss(&id).flatten();
        if let Some(listener) = released {
            // This may be the listener that is running; free it once it returns.
            spawn_local(async move { drop(listener) });
        }
    }
}

fn build_alert(document: &Document, id: &str, notice: &Notice) -> Result<Element, JsValue> {
    let element = |tag: &str, class: &str| -> Result<Element, JsValue> {
        let el = document.create_element(tag)?;
        el.set_class_name(class);
        Ok(el)
    };

    let alert = element("div", notice.alert_class())?;
    alert.set_id(id);
    alert.set_attribute("role", "alert")?;

    let row = element("div", "d-flex align-items-center")?;
    let icon = element("i", notice.icon_class())?;
    icon.set_attribute("style", "font-size: 1.5rem;")?;

    let body = element("div", "")?;
    let heading = element("h5", "alert-heading mb-1")?;
    heading.set_text_content(Some(notice.heading()));
    let message = element("p", "mb-0")?;
    message.set_attribute("style", "white-space: pre-line;")?;
    message.set_text_content(Some(&notice.message));
    body.append_child(&heading)?;
    body.append_child(&message)?;

    let close = element("button", "btn-close ms-auto")?;
    close.set_attribute("type", "button")?;
    close.set_attribute("aria-label", "Close")?;

    row.append_child(&icon)?;
    row.append_child(&body)?;
    row.append_child(&close)?;
    alert.append_child(&row)?;
    Ok(alert)
}

/// Live submit interception on a form. Dropping it unbinds the form.
pub struct FormBinding {
    form: HtmlFormElement,
    listener: Closure<dyn FnMut(Event)>,
}

impl FormBinding {
    /// Binds `service` to the form its config points at. Returns `None` and
    /// leaves the page untouched when the form is not in the document.
    pub fn initialize<D: Delivery + 'static>(service: Rc<FormService<D>>) -> Option<Self> {
        let document = web_sys::window()?.document()?;
        let config = service.config();
        let selector = config.form_selector.clone();

        let form = match document.query_selector(&selector) {
            Ok(Some(el)) => el.dyn_into::<HtmlFormElement>().ok(),
            _ => None,
        };
        let Some(form) = form else {
            warn!("Form not found with selector: {}", selector);
            return None;
        };

        let submit = form
            .query_selector(&config.submit_selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let original_label = submit
            .as_ref()
            .and_then(|button| button.text_content())
            .unwrap_or_default();

        let mut field_names = config.required_fields.clone();
        for name in [NAME_FIELD, EMAIL_FIELD, PHONE_FIELD, MESSAGE_FIELD] {
            if !field_names.iter().any(|n| n == name) {
                field_names.push(name.to_string());
            }
        }

        let surface = Rc::new(DomForm {
            document,
            form: form.clone(),
            submit,
            original_label,
            field_names,
            alerts: Rc::new(RefCell::new(AlertStack::new())),
        });

        let listener = Closure::wrap(Box::new(move |event: Event| {
            event.prevent_default();
            let service = service.clone();
            let surface = surface.clone();
            spawn_local(async move {
                service.submit(&*surface).await;
            });
        }) as Box<dyn FnMut(Event)>);

        let callback = listener.as_ref().unchecked_ref();
        if let Err(e) = form.add_event_listener_with_callback("submit", callback) {
            error!("Failed to bind form {}: {:?}", selector, e);
            return None;
        }

        info!("Contact form bound to {}", selector);
        Some(Self { form, listener })
    }
}

impl Drop for FormBinding {
    fn drop(&mut self) {
        let _ = self
            .form
            .remove_event_listener_with_callback("submit", self.listener.as_ref().unchecked_ref());
    }
}
