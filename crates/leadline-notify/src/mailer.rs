//! Transactional email delivery.

use std::{future::Future, time::Duration};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{DemoRequest, MailError, html::render_demo_email};

pub const DEFAULT_TO_EMAIL: &str = "federudiero@gmail.com";
pub const DEFAULT_FROM_EMAIL: &str = "Zenvicode <onboarding@resend.dev>";
pub const DEFAULT_API_BASE: &str = "https://api.resend.com";

/// Mail settings, read from the `[mail]` table of the server config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MailConfig {
  /// Bearer credential for the email API. Without it every send fails.
  pub api_key:    Option<String>,
  pub to_email:   String,
  pub from_email: String,
  pub api_base:   String,
}

impl Default for MailConfig {
  fn default() -> Self {
    Self {
      api_key:    None,
      to_email:   DEFAULT_TO_EMAIL.to_owned(),
      from_email: DEFAULT_FROM_EMAIL.to_owned(),
      api_base:   DEFAULT_API_BASE.to_owned(),
    }
  }
}

/// The JSON body accepted by `POST /emails`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingEmail {
  pub from:     String,
  pub to:       String,
  pub subject:  String,
  pub html:     String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub reply_to: Option<String>,
}

/// The upstream message id, when the API returned one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SentEmail {
  pub id: Option<String>,
}

/// Something that can deliver an [`OutgoingEmail`].
pub trait Mailer: Send + Sync {
  fn send(
    &self,
    email: OutgoingEmail,
  ) -> impl Future<Output = Result<SentEmail, MailError>> + Send + '_;
}

// ─── Resend ──────────────────────────────────────────────────────────────────

/// [`Mailer`] backed by the Resend HTTP API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ResendMailer {
  client:   Client,
  api_key:  Option<String>,
  api_base: String,
}

impl ResendMailer {
  pub fn new(config: &MailConfig) -> Result<Self, MailError> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self {
      client,
      api_key: config.api_key.clone().filter(|k| !k.trim().is_empty()),
      api_base: config.api_base.clone(),
    })
  }

  fn url(&self) -> String { format!("{}/emails", self.api_base.trim_end_matches('/')) }
}

impl Mailer for ResendMailer {
  async fn send(&self, email: OutgoingEmail) -> Result<SentEmail, MailError> {
    let Some(api_key) = self.api_key.as_deref() else {
      return Err(MailError::NotConfigured);
    };

    let resp = self
      .client
      .post(self.url())
      .bearer_auth(api_key)
      .json(&email)
      .send()
      .await?;

    let status = resp.status();
    // The body may be empty or not JSON; treat that as an empty object.
    let body: Value = resp.json().await.unwrap_or_else(|_| Value::Object(Default::default()));

    if !status.is_success() {
      let payload = body
        .get("error")
        .filter(|e| !e.is_null())
        .cloned()
        .unwrap_or_else(|| Value::String("Resend error".into()));
      tracing::warn!(status = status.as_u16(), %payload, "email API rejected message");
      return Err(MailError::Upstream { status: status.as_u16(), payload });
    }

    let id = body.get("id").and_then(Value::as_str).map(str::to_owned);
    Ok(SentEmail { id })
  }
}

// ─── Demo notifications ──────────────────────────────────────────────────────

/// Renders demo requests and hands them to a [`Mailer`].
pub struct DemoNotifier<M> {
  mailer: M,
  config: MailConfig,
}

impl<M: Mailer> DemoNotifier<M> {
  pub fn new(mailer: M, config: MailConfig) -> Self { Self { mailer, config } }

  pub async fn notify(&self, request: &DemoRequest) -> Result<SentEmail, MailError> {
    let email = render_demo_email(request, &self.config);
    let sent  = self.mailer.send(email).await?;
    tracing::info!(
      company = %request.company,
      message_id = sent.id.as_deref().unwrap_or(""),
      "demo request notification sent"
    );
    Ok(sent)
  }
}
