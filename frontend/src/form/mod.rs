//! Contact form helper: validates a bound form and relays accepted
//! submissions through a [`Delivery`] collaborator.
//!
//! The state machine lives in [`service`] and only talks to the page through
//! [`FormSurface`], so it runs the same against the live DOM ([`dom`]) and
//! against in-memory fakes.

pub mod config;
pub mod delivery;
pub mod dom;
pub mod notice;
pub mod service;
pub mod validation;

pub use config::{DeliveryCredentials, SubmissionConfig};
pub use delivery::{Delivery, EmailJs};
pub use dom::FormBinding;
pub use service::FormService;
