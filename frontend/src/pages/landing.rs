use std::rc::Rc;

use chrono::Datelike;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::components::nav::Nav;
use crate::components::reveal::Reveal;
use crate::config;
use crate::content::loader::load_content;
use crate::content::{ContentDocument, Contact};
use crate::form::{EmailJs, FormBinding, FormService};

/// Head tags filled in from the content document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub og_title: String,
    pub og_description: String,
    pub twitter_title: String,
    pub twitter_description: String,
}

impl From<&ContentDocument> for PageMetadata {
    fn from(content: &ContentDocument) -> Self {
        let title = content.page_title();
        let social = content.social_description().to_string();
        Self {
            og_title: title.clone(),
            title,
            description: content.description().to_string(),
            og_description: social.clone(),
            twitter_title: content.name.clone(),
            twitter_description: social,
        }
    }
}

fn apply_metadata(content: &ContentDocument) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let meta = PageMetadata::from(content);
    document.set_title(&meta.title);

    for (id, value) in [
        ("pageDesc", &meta.description),
        ("ogTitle", &meta.og_title),
        ("ogDesc", &meta.og_description),
        ("twitterTitle", &meta.twitter_title),
        ("twitterDesc", &meta.twitter_description),
    ] {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("content", value);
        }
    }
}

#[derive(Properties, PartialEq)]
struct SectionProps {
    content: Rc<ContentDocument>,
}

#[derive(Properties, PartialEq)]
struct ContactCardProps {
    contact: Contact,
}

#[function_component(ContactLines)]
fn contact_lines(props: &ContactCardProps) -> Html {
    let contact = &props.contact;
    html! {
        <>
            <p class="mb-1"><strong>{"Phone:"}</strong>{" "}<a href={contact.tel_href()}>{&contact.phone}</a></p>
            <p class="mb-1"><strong>{"Email:"}</strong>{" "}<a href={contact.mailto_href()}>{&contact.email}</a></p>
            <p class="mb-0"><strong>{"Address:"}</strong>{" "}{&contact.address}</p>
        </>
    }
}

#[function_component(Hero)]
fn hero(props: &SectionProps) -> Html {
    let content = &props.content;
    html! {
        <section id="heroSection" class="hero">
            <div class="container">
                <div class="row align-items-center g-4">
                    <div class="col-lg-6">
                        <h2 class="hero-company-name">{&content.name}</h2>
                        <h1 class="display-6 fw-bold">{&content.tagline}</h1>
                        <span class="badge rounded-pill mb-3">{format!("Trusted Trucking • {}", content.business_scope)}</span>
                        <p class="text-muted mb-4">{&content.about}</p>
                        <div class="d-flex gap-2 flex-wrap">
                            <a class="btn btn-primary btn-lg" href="#contact">{"Request Quote"}</a>
                            <a class="btn btn-outline-secondary btn-lg" href="#services">{"Our Services"}</a>
                        </div>
                    </div>
                    <div class="col-lg-6 d-flex justify-content-center align-items-center">
                        <img src="./img/el_truck1.jpg" alt="Delivery Truck" class="hero-truck-image" />
                    </div>
                </div>
                <div class="row mt-4">
                    <div class="col-lg-6 mx-auto">
                        <div class="card shadow-sm contact-card">
                            <div class="card-body">
                                <h5 class="card-title mb-3"><i class="bi bi-telephone me-2 text-primary"></i>{"Get in Touch"}</h5>
                                <ContactLines contact={content.contact.clone()} />
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </section>
    }
}

#[function_component(About)]
fn about(props: &SectionProps) -> Html {
    let content = &props.content;
    html! {
        <section id="about" class="container py-5">
            <div class="row">
                <div class="col-lg-8">
                    <h2 class="h4 section-title"><i class="bi bi-info-circle text-primary me-2"></i>{format!("About {}", content.name)}</h2>
                    <p class="text-muted">{&content.about}</p>
                </div>
                <div class="col-lg-4">
                    <ul class="list-unstyled features">
                        <li><i class="bi bi-globe text-muted me-2"></i>{format!("Service Area: {}", content.business_scope)}</li>
                        <li><i class="bi bi-upc-scan text-muted me-2"></i>{format!("DOT: {}", content.dot_number)}</li>
                        <li><i class="bi bi-briefcase text-muted me-2"></i>{format!("MC: {}", content.mc_number)}</li>
                    </ul>
                </div>
            </div>
        </section>
    }
}

#[function_component(Services)]
fn services(props: &SectionProps) -> Html {
    html! {
        <section id="services" class="container py-5">
            <div class="row mb-4 align-items-center">
                <div class="col-lg-6">
                    <h3 class="h5 section-title mb-4"><i class="bi bi-box-seam text-primary me-2"></i>{"Our Services"}</h3>
                    <div class="row g-3">
                        { for props.content.services.iter().map(|service| html! {
                            <div class="col-md-6 col-lg-12">
                                <div class="card card-service h-100">
                                    <div class="card-body d-flex flex-column">
                                        <div class="mb-3">
                                            <i class={classes!("bi", format!("bi-{}", service.icon), "service-icon")}></i>
                                        </div>
                                        <h5 class="card-title">{&service.name}</h5>
                                        <p class="card-text text-muted">{&service.description}</p>
                                    </div>
                                </div>
                            </div>
                        }) }
                    </div>
                </div>
                <div class="col-lg-6 d-flex justify-content-center align-items-center mt-4 mt-lg-0">
                    <img src="./img/el_truck2.jpg" alt="Logistics Services" class="services-truck-image" />
                </div>
            </div>
        </section>
    }
}

#[function_component(Mission)]
fn mission(props: &SectionProps) -> Html {
    html! {
        <section id="mission" class="container py-5">
            <h3 class="h5 section-title"><i class="bi bi-bullseye text-primary me-2"></i>{"Our Mission"}</h3>
            <p class="text-muted">{&props.content.mission}</p>
        </section>
    }
}

#[function_component(WhyChooseUs)]
fn why_choose_us(props: &SectionProps) -> Html {
    html! {
        <section id="why" class="container py-5">
            <h3 class="h5 section-title"><i class="bi bi-award text-primary me-2"></i>{"Why Choose Us"}</h3>
            <div class="row">
                { for props.content.why_choose_us.iter().map(|item| html! {
                    <div class="col-md-6">
                        <div class="mb-3">
                            <h6 class="fw-bold">
                                <i class={classes!("bi", format!("bi-{}", item.icon), "text-primary", "me-2")}></i>
                                {&item.title}
                            </h6>
                            <p class="text-muted small">{&item.description}</p>
                        </div>
                    </div>
                }) }
            </div>
        </section>
    }
}

#[function_component(ContactSection)]
fn contact_section(props: &SectionProps) -> Html {
    html! {
        <section id="contact" class="container py-5">
            <h3 class="h5 section-title"><i class="bi bi-chat-dots text-primary me-2"></i>{"Contact Us"}</h3>
            <div class="row">
                <div class="col-md-6">
                    <ContactLines contact={props.content.contact.clone()} />
                </div>
                <div class="col-md-6">
                    <form id="contactForm" name="contactForm">
                        <div class="mb-3">
                            <label class="form-label">{"Name"}</label>
                            <input type="text" class="form-control" name="name" placeholder="Your name" required=true />
                        </div>
                        <div class="mb-3">
                            <label class="form-label">{"Email"}</label>
                            <input type="email" class="form-control" name="email" placeholder="you@example.com" required=true />
                        </div>
                        <div class="mb-3">
                            <label class="form-label">{"Phone"}</label>
                            <input type="tel" class="form-control" name="phone" placeholder="(optional)" />
                        </div>
                        <div class="mb-3">
                            <label class="form-label">{"Message"}</label>
                            <textarea class="form-control" name="message" rows="3" placeholder="How can we help?" required=true />
                        </div>
                        <button type="submit" class="btn btn-primary">{"Send Message"}</button>
                    </form>
                </div>
            </div>
        </section>
    }
}

#[function_component(Careers)]
fn careers(props: &SectionProps) -> Html {
    html! {
        <section id="careers" class="container py-5">
            <h3 class="h5 section-title"><i class="bi bi-people-fill text-primary me-2"></i>{"Join Our Team"}</h3>
            <p class="text-muted">{&props.content.careers}</p>
        </section>
    }
}

#[function_component(Testimonials)]
fn testimonials(props: &SectionProps) -> Html {
    html! {
        <section id="testimonials" class="container py-5">
            <h3 class="h5 section-title mb-4"><i class="bi bi-chat-quote text-primary me-2"></i>{"What Our Clients Say"}</h3>
            <div class="row g-3">
                { for props.content.testimonials.iter().map(|testimonial| html! {
                    <div class="col-md-6 col-lg-4">
                        <div class="card card-testimonial h-100">
                            <div class="card-body">
                                <div class="mb-2">
                                    { for (0..testimonial.stars()).map(|_| html! {
                                        <i class="bi bi-star-fill text-warning"></i>
                                    }) }
                                </div>
                                <p class="card-text text-muted mb-3">{format!("\"{}\"", testimonial.quote)}</p>
                                <p class="card-text fw-bold mb-0"><small>{testimonial.attribution()}</small></p>
                            </div>
                        </div>
                    </div>
                }) }
            </div>
        </section>
    }
}

#[function_component(Footer)]
fn footer(props: &SectionProps) -> Html {
    let content = &props.content;
    let year = chrono::Local::now().year();
    html! {
        <footer class="footer py-4">
            <div class="container text-center">
                <p class="mb-1">{format!("© {} ", year)}<span id="footerName">{&content.name}</span></p>
                <p class="mb-1 small" id="footerLicense">{content.license_line()}</p>
                if let Some(appdev) = &content.appdev {
                    <p class="mb-0 small">
                        {"Built by "}
                        <a id="appdevLink" href={appdev.href()} target="_blank" rel="noopener">{&appdev.name}</a>
                    </p>
                }
            </div>
        </footer>
    }
}

#[function_component(Landing)]
pub fn landing() -> Html {
    let content = use_state(|| None::<Rc<ContentDocument>>);
    let form_service = use_memo(
        |_| FormService::new(config::contact_form_config(), EmailJs::default()),
        (),
    );

    {
        let content = content.clone();
        use_effect_with_deps(
            move |_| {
                spawn_local(async move {
                    let document = load_content(config::CONTENT_PATH).await;
                    content.set(Some(Rc::new(document)));
                });
                || ()
            },
            (),
        );
    }

    // Runs after the sections are in the DOM, so the form exists to bind to.
    {
        let form_service = form_service.clone();
        use_effect_with_deps(
            move |content: &Option<Rc<ContentDocument>>| {
                let mounted = content.as_ref().map(|document| {
                    apply_metadata(document);
                    (FormBinding::initialize(form_service), Reveal::start())
                });
                move || drop(mounted)
            },
            (*content).clone(),
        );
    }

    let Some(content) = (*content).clone() else {
        return html! {
            <>
                <Nav brand="" />
                <main class="page-loading"></main>
            </>
        };
    };

    html! {
        <>
            <Nav brand={content.name.clone()} />
            <main>
                <Hero content={content.clone()} />
                <About content={content.clone()} />
                <Services content={content.clone()} />
                <Mission content={content.clone()} />
                <WhyChooseUs content={content.clone()} />
                <ContactSection content={content.clone()} />
                <Careers content={content.clone()} />
                <Testimonials content={content.clone()} />
            </main>
            <Footer content={content} />
        </>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_uses_name_and_tagline() {
        let content = ContentDocument {
            name: "Emerging Logistics".into(),
            tagline: "Freight done right".into(),
            about: "Family-owned carrier.".into(),
            ..Default::default()
        };

        let meta = PageMetadata::from(&content);
        assert_eq!(meta.title, "Emerging Logistics | Professional Freight & Logistics");
        assert_eq!(meta.og_title, meta.title);
        assert_eq!(meta.description, "Family-owned carrier.");
        assert_eq!(meta.og_description, "Freight done right");
        assert_eq!(meta.twitter_title, "Emerging Logistics");
        assert_eq!(meta.twitter_description, "Freight done right");
    }

    #[test]
    fn metadata_falls_back_on_empty_document() {
        let meta = PageMetadata::from(&ContentDocument::default());
        assert_eq!(meta.description, "Professional freight & logistics solutions.");
        assert_eq!(meta.twitter_description, "Reliable freight solutions nationwide");
    }
}
