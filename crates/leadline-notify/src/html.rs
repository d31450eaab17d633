//! HTML rendering of the demo-request notification.

use crate::{DemoRequest, MailConfig, OutgoingEmail};

/// Escape the five characters significant in HTML text and attribute values.
pub fn escape_html(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#039;"),
      c => out.push(c),
    }
  }
  out
}

/// Build the notification sent to the sales inbox for one demo request.
///
/// The subject is plain text and is not escaped; every value interpolated
/// into the HTML body is.
pub fn render_demo_email(req: &DemoRequest, config: &MailConfig) -> OutgoingEmail {
  let company = escape_html(&req.company);
  let name    = escape_html(&req.name);
  let email   = escape_html(&req.email);
  let message = escape_html(&req.message);

  let html = format!(
    r#"<div style="font-family:system-ui,Segoe UI,Roboto,Helvetica,Arial,sans-serif;color:#111">
  <h2 style="margin:0 0 12px 0">New Demo Request</h2>
  <p style="margin:0 0 6px 0"><strong>Company:</strong> {company}</p>
  <p style="margin:0 0 6px 0"><strong>Name:</strong> {name}</p>
  <p style="margin:0 0 6px 0"><strong>Email:</strong> {email}</p>
  <p style="margin:0 0 6px 0"><strong>Message:</strong></p>
  <div style="white-space:pre-wrap;border:1px solid #eee;border-radius:8px;padding:12px;background:#fafafa">{message}</div>
</div>"#
  );

  OutgoingEmail {
    from: config.from_email.clone(),
    to: config.to_email.clone(),
    subject: format!("New demo request from {} ({})", req.name, req.company),
    html,
    reply_to: Some(req.email.clone()),
  }
}
