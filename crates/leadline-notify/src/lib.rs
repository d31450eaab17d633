//! Demo-request notifications for Leadline.
//!
//! Validates the public demo-request payload, renders an HTML notification
//! with every user-supplied field escaped, and hands it to a transactional
//! email API. Nothing here touches the lead store.

pub mod demo;
pub mod error;
pub mod html;
pub mod mailer;

pub use demo::{DemoRequest, DemoRequestBody, FieldErrors};
pub use error::MailError;
pub use mailer::{DemoNotifier, MailConfig, Mailer, OutgoingEmail, ResendMailer, SentEmail};
