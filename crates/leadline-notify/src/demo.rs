//! Demo-request payload and its validation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MIN_COMPANY_CHARS: usize = 2;
pub const MIN_NAME_CHARS: usize = 2;
pub const MIN_MESSAGE_CHARS: usize = 10;

/// The raw JSON body as posted by the site. Fields are kept untyped so that
/// missing and mistyped values can be reported per field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DemoRequestBody {
  pub company: Option<Value>,
  pub name:    Option<Value>,
  pub email:   Option<Value>,
  pub message: Option<Value>,
}

/// A validated demo request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoRequest {
  pub company: String,
  pub name:    String,
  pub email:   String,
  pub message: String,
}

/// Validation failures, grouped per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
  /// Errors not attached to a single field (e.g. a body that is not JSON).
  pub form_errors:  Vec<String>,
  pub field_errors: BTreeMap<&'static str, Vec<String>>,
}

impl FieldErrors {
  pub fn form(message: impl Into<String>) -> Self {
    Self { form_errors: vec![message.into()], ..Self::default() }
  }

  pub fn is_empty(&self) -> bool {
    self.form_errors.is_empty() && self.field_errors.is_empty()
  }

  fn push(&mut self, field: &'static str, message: String) {
    self.field_errors.entry(field).or_default().push(message);
  }
}

impl DemoRequest {
  /// Validate every field and collect all failures, not just the first.
  pub fn validate(body: DemoRequestBody) -> Result<Self, FieldErrors> {
    let mut errors = FieldErrors::default();

    let company = min_chars(&mut errors, "company", body.company, MIN_COMPANY_CHARS);
    let name    = min_chars(&mut errors, "name", body.name, MIN_NAME_CHARS);
    let email   = string_field(&mut errors, "email", body.email).filter(|email| {
      let ok = is_email_shaped(email);
      if !ok {
        errors.push("email", "Invalid email".into());
      }
      ok
    });
    let message = min_chars(&mut errors, "message", body.message, MIN_MESSAGE_CHARS);

    match (company, name, email, message) {
      (Some(company), Some(name), Some(email), Some(message)) if errors.is_empty() => {
        Ok(Self { company, name, email, message })
      }
      _ => Err(errors),
    }
  }
}

fn string_field(
  errors: &mut FieldErrors,
  field: &'static str,
  value: Option<Value>,
) -> Option<String> {
  match value {
    None | Some(Value::Null) => {
      errors.push(field, "Required".into());
      None
    }
    Some(Value::String(s)) => Some(s),
    Some(other) => {
      errors.push(field, format!("Expected string, received {}", json_kind(&other)));
      None
    }
  }
}

fn min_chars(
  errors: &mut FieldErrors,
  field: &'static str,
  value: Option<Value>,
  min: usize,
) -> Option<String> {
  let s = string_field(errors, field, value)?;
  if s.chars().count() < min {
    errors.push(field, format!("String must contain at least {min} character(s)"));
    return None;
  }
  Some(s)
}

fn json_kind(v: &Value) -> &'static str {
  match v {
    Value::Null => "null",
    Value::Bool(_) => "boolean",
    Value::Number(_) => "number",
    Value::String(_) => "string",
    Value::Array(_) => "array",
    Value::Object(_) => "object",
  }
}

/// A deliberately plain shape check: `local@label.label…tld`.
pub fn is_email_shaped(s: &str) -> bool {
  let Some((local, domain)) = s.rsplit_once('@') else {
    return false;
  };

  let local_ok = !local.is_empty()
    && !local.starts_with('.')
    && !local.ends_with('.')
    && !local.contains("..")
    && local
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || "_'+-.".contains(c));

  let labels: Vec<&str> = domain.split('.').collect();
  let domain_ok = labels.len() >= 2
    && labels.iter().all(|l| {
      !l.is_empty()
        && !l.starts_with('-')
        && l.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
    && labels
      .last()
      .is_some_and(|tld| tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));

  local_ok && domain_ok
}
