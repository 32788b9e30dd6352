use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, Event, HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions,
    ScrollToOptions,
};
use yew::prelude::*;
use yew_hooks::prelude::*;

/// Viewport width at which the collapsed mobile menu turns into the full bar.
pub const DESKTOP_MIN_WIDTH: f64 = 992.0;
pub const RETURN_TO_TOP_AFTER: f64 = 400.0;
const SCROLL_SETTLE_MS: u32 = 10;
const LOGO_PULSE_CLASS: &str = "logo-click-pulse";

pub const NAV_LINKS: [(&str, &str); 6] = [
    ("#about", "About"),
    ("#services", "Services"),
    ("#why", "Why Us"),
    ("#testimonials", "Testimonials"),
    ("#careers", "Careers"),
    ("#contact", "Contact"),
];

pub fn is_desktop(width: f64) -> bool {
    width >= DESKTOP_MIN_WIDTH
}

pub fn shows_return_to_top(scroll_y: f64) -> bool {
    scroll_y > RETURN_TO_TOP_AFTER
}

/// Element id an in-page link points at. Bare `#` and other links have none.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

fn current_scroll_y() -> f64 {
    web_sys::window()
        .and_then(|w| w.scroll_y().ok())
        .unwrap_or(0.0)
}

fn current_width() -> f64 {
    web_sys::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}

fn scroll_to_top() {
    if let Some(window) = web_sys::window() {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Smooth-scrolls to the section `href` names and drops the hash from the
/// URL. Returns false when there is no such section.
fn scroll_to_section(href: &str) -> bool {
    let Some(id) = anchor_target(href) else { return false };
    let Some(window) = web_sys::window() else { return false };
    let Some(target) = window.document().and_then(|d| d.get_element_by_id(id)) else {
        return false;
    };

    if let Ok(history) = window.history() {
        let path = window.location().pathname().unwrap_or_default();
        let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(&path));
    }

    let options = ScrollIntoViewOptions::new();
    options.set_behavior(ScrollBehavior::Smooth);
    target.scroll_into_view_with_scroll_into_view_options(&options);
    true
}

#[derive(Properties, PartialEq)]
pub struct NavProps {
    pub brand: AttrValue,
}

#[function_component(Nav)]
pub fn nav(props: &NavProps) -> Html {
    let menu_open = use_state_eq(|| false);
    let show_return_to_top = use_state_eq(|| shows_return_to_top(current_scroll_y()));
    let scroll_settle = use_mut_ref(|| None::<Timeout>);
    let logo_ref = use_node_ref();

    {
        let show_return_to_top = show_return_to_top.clone();
        use_event_with_window("scroll", move |_: Event| {
            let show_return_to_top = show_return_to_top.clone();
            // Replacing the pending timeout cancels it.
            *scroll_settle.borrow_mut() = Some(Timeout::new(SCROLL_SETTLE_MS, move || {
                show_return_to_top.set(shows_return_to_top(current_scroll_y()));
            }));
        });
    }

    {
        let menu_open = menu_open.clone();
        use_event_with_window("resize", move |_: Event| {
            if is_desktop(current_width()) {
                menu_open.set(false);
            }
        });
    }

    // Delegated so links rendered from content get smooth scrolling too.
    {
        let menu_open = menu_open.clone();
        use_event_with_window("click", move |e: MouseEvent| {
            let Some(target) = e.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };

            if target.closest(".navbar").ok().flatten().is_none() {
                menu_open.set(false);
            }

            if let Ok(Some(anchor)) = target.closest("a[href^=\"#\"]") {
                let href = anchor.get_attribute("href").unwrap_or_default();
                if scroll_to_section(&href) {
                    e.prevent_default();
                    if !is_desktop(current_width()) {
                        menu_open.set(false);
                    }
                }
            }
        });
    }

    let toggle_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            debug!("Mobile menu {}", if *menu_open { "closed" } else { "opened" });
            menu_open.set(!*menu_open);
        })
    };

    let close_menu = {
        let menu_open = menu_open.clone();
        Callback::from(move |_: MouseEvent| {
            menu_open.set(false);
        })
    };

    let on_logo_click = {
        let logo_ref = logo_ref.clone();
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            if let Some(logo) = logo_ref.cast::<HtmlElement>() {
                let classes = logo.class_list();
                let _ = classes.remove_1(LOGO_PULSE_CLASS);
                // Reading layout forces a reflow so the animation starts over.
                let _ = logo.offset_width();
                let _ = classes.add_1(LOGO_PULSE_CLASS);
            }
            scroll_to_top();
        })
    };

    let on_return_to_top = Callback::from(|_: MouseEvent| scroll_to_top());

    html! {
        <>
            <nav class="navbar navbar-expand-lg fixed-top">
                <div class="container">
                    <a class="navbar-brand" href="#" onclick={on_logo_click}>
                        <span ref={logo_ref} class="navbar-logo">{props.brand.clone()}</span>
                    </a>
                    <button
                        class="navbar-toggler"
                        type="button"
                        aria-controls="navMenu"
                        aria-expanded={(*menu_open).to_string()}
                        aria-label="Toggle navigation"
                        onclick={toggle_menu}
                    >
                        if *menu_open {
                            <i class="bi bi-x-lg navbar-close-icon"></i>
                        } else {
                            <span class="navbar-toggler-icon"></span>
                        }
                    </button>
                    <div id="navMenu" class={classes!("collapse", "navbar-collapse", (*menu_open).then_some("show"))}>
                        <ul class="navbar-nav ms-auto">
                            { for NAV_LINKS.iter().map(|(href, label)| html! {
                                <li class="nav-item">
                                    <a class="nav-link" href={*href} onclick={close_menu.clone()}>{*label}</a>
                                </li>
                            }) }
                        </ul>
                    </div>
                </div>
            </nav>
            if *show_return_to_top {
                <button id="returnToTopBtn" class="return-to-top" aria-label="Return to top" onclick={on_return_to_top}>
                    <i class="bi bi-arrow-up"></i>
                </button>
            }
        </>
    }
}
