use log::warn;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Event, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, Window,
};

pub const FADE_IN: &str = "fadeIn 0.6s ease-in-out forwards";
const STAGGER_SECS: f64 = 0.08;
const ON_LOAD_SELECTOR: &str = ".hero, .card, section";
const ON_SCROLL_SELECTOR: &str = "section, .card";
const VISIBLE_THRESHOLD: f64 = 0.1;
const ROOT_MARGIN: &str = "0px 0px -100px 0px";

/// Fade-in for the `index`th element on page load, delayed 0.08s per step.
pub fn staggered_fade_in(index: usize) -> String {
    let delay = format!("{:.2}", index as f64 * STAGGER_SECS);
    let delay = delay.trim_end_matches('0').trim_end_matches('.');
    format!("fadeIn 0.6s ease-in-out {}s forwards", delay)
}

fn elements(document: &Document, selector: &str) -> Vec<HtmlElement> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect()
}

fn fade_in_on_load(document: &Document) {
    for (index, el) in elements(document, ON_LOAD_SELECTOR).iter().enumerate() {
        let style = el.style();
        let _ = style.set_property("opacity", "0");
        let _ = style.set_property("animation", &staggered_fade_in(index));
    }
}

/// Page-load and scroll-triggered fade-ins. Dropping it stops observing.
pub struct Reveal {
    window: Window,
    observer: Option<IntersectionObserver>,
    _on_intersect: Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>,
    on_load: Option<Closure<dyn FnMut(Event)>>,
}

impl Reveal {
    pub fn start() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;

        let on_load = if document.ready_state() == "complete" {
            fade_in_on_load(&document);
            None
        } else {
            let doc = document.clone();
            let on_load = Closure::wrap(
                Box::new(move |_: Event| fade_in_on_load(&doc)) as Box<dyn FnMut(Event)>,
            );
            let _ = window
                .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
            Some(on_load)
        };

        let on_intersect = Closure::wrap(Box::new(
            |entries: js_sys::Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if !entry.is_intersecting() {
                        continue;
                    }
                    let target = entry.target();
                    if let Some(el) = target.dyn_ref::<HtmlElement>() {
                        let _ = el.style().set_property("animation", FADE_IN);
                    }
                    observer.unobserve(&target);
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, IntersectionObserver)>);

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(VISIBLE_THRESHOLD));
        options.set_root_margin(ROOT_MARGIN);

        let callback = on_intersect.as_ref().unchecked_ref();
        let observer = match IntersectionObserver::new_with_options(callback, &options) {
            Ok(observer) => Some(observer),
            Err(e) => {
                warn!("Scroll animations disabled: {:?}", e);
                None
            }
        };

        // Only pages opened at the top get the scroll reveal.
        if let Some(observer) = &observer {
            if window.scroll_y().unwrap_or(0.0) == 0.0 {
                for el in elements(&document, ON_SCROLL_SELECTOR) {
                    observer.observe(&el);
                }
            }
        }

        Some(Self {
            window,
            observer,
            _on_intersect: on_intersect,
            on_load,
        })
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        if let Some(observer) = &self.observer {
            observer.disconnect();
        }
        if let Some(on_load) = &self.on_load {
            let _ = self
                .window
                .remove_event_listener_with_callback("load", on_load.as_ref().unchecked_ref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stagger_grows_by_index() {
        assert_eq!(staggered_fade_in(0), "fadeIn 0.6s ease-in-out 0s forwards");
        assert_eq!(staggered_fade_in(1), "fadeIn 0.6s ease-in-out 0.08s forwards");
        assert_eq!(staggered_fade_in(3), "fadeIn 0.6s ease-in-out 0.24s forwards");
        assert_eq!(staggered_fade_in(10), "fadeIn 0.6s ease-in-out 0.8s forwards");
    }
}
