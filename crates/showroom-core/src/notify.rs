//! Storefront notifications: contact enquiries and order requests.
//!
//! Each kind renders a fixed HTML template. The payload is discriminated by
//! its `type` field; an unknown `type` fails deserialization, so there is no
//! path that produces an email with an empty body.

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::traits::Mailer;

/// A rendered message ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub subject: String,
    pub html: String,
    /// Address of the customer, so staff can answer directly.
    pub reply_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub car_title: Option<String>,
    pub car_id: Option<String>,
    pub price: Option<serde_json::Value>,
    pub message: Option<String>,
}

/// Body of `POST /api/send-email`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", content = "formData", rename_all = "lowercase")]
pub enum Notification {
    Contact(ContactForm),
    Order(OrderForm),
}

impl Notification {
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::Contact(_) => "contact",
            Notification::Order(_) => "order",
        }
    }

    /// Parse a raw request body, mapping shape errors to validation errors.
    pub fn from_json(value: serde_json::Value) -> Result<Self, AppError> {
        let notification: Notification = serde_json::from_value(value)
            .map_err(|e| AppError::ValidationError(format!("Invalid notification: {e}")))?;
        notification.validate()?;
        Ok(notification)
    }

    fn validate(&self) -> Result<(), AppError> {
        let (name, email) = match self {
            Notification::Contact(f) => (&f.name, &f.email),
            Notification::Order(f) => (&f.name, &f.email),
        };
        if name.trim().is_empty() {
            return Err(AppError::ValidationError("name is required".into()));
        }
        if !email.contains('@') {
            return Err(AppError::ValidationError(format!(
                "email '{email}' is not a valid address"
            )));
        }
        if let Notification::Contact(f) = self {
            if f.message.trim().is_empty() {
                return Err(AppError::ValidationError("message is required".into()));
            }
        }
        Ok(())
    }

    pub fn render(&self) -> Email {
        match self {
            Notification::Contact(form) => render_contact(form),
            Notification::Order(form) => render_order(form),
        }
    }
}

fn render_contact(form: &ContactForm) -> Email {
    let subject = match form.subject.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => format!("New contact enquiry: {s}"),
        _ => format!("New contact enquiry from {}", form.name.trim()),
    };

    let html = format!(
        "<h2>New Contact Form Submission</h2>\
         <table>\
         <tr><td><strong>Name:</strong></td><td>{name}</td></tr>\
         <tr><td><strong>Email:</strong></td><td>{email}</td></tr>\
         <tr><td><strong>Phone:</strong></td><td>{phone}</td></tr>\
         <tr><td><strong>Subject:</strong></td><td>{subject}</td></tr>\
         </table>\
         <h3>Message</h3>\
         <p>{message}</p>",
        name = escape_html(&form.name),
        email = escape_html(&form.email),
        phone = or_dash(form.phone.as_deref()),
        subject = or_dash(form.subject.as_deref()),
        message = escape_html(&form.message).replace('\n', "<br>"),
    );

    Email {
        subject,
        html,
        reply_to: Some(form.email.trim().to_string()),
    }
}

fn render_order(form: &OrderForm) -> Email {
    let subject = match form.car_title.as_deref().map(str::trim) {
        Some(t) if !t.is_empty() => format!("New order request: {t}"),
        _ => format!("New order request from {}", form.name.trim()),
    };

    let price = form.price.as_ref().map(|p| match p {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    });

    let html = format!(
        "<h2>New Car Order Request</h2>\
         <table>\
         <tr><td><strong>Name:</strong></td><td>{name}</td></tr>\
         <tr><td><strong>Email:</strong></td><td>{email}</td></tr>\
         <tr><td><strong>Phone:</strong></td><td>{phone}</td></tr>\
         <tr><td><strong>Car:</strong></td><td>{car}</td></tr>\
         <tr><td><strong>Listing ID:</strong></td><td>{car_id}</td></tr>\
         <tr><td><strong>Price:</strong></td><td>{price}</td></tr>\
         </table>\
         <h3>Additional Notes</h3>\
         <p>{message}</p>",
        name = escape_html(&form.name),
        email = escape_html(&form.email),
        phone = or_dash(form.phone.as_deref()),
        car = or_dash(form.car_title.as_deref()),
        car_id = or_dash(form.car_id.as_deref()),
        price = or_dash(price.as_deref()),
        message = or_dash(form.message.as_deref()).replace('\n', "<br>"),
    );

    Email {
        subject,
        html,
        reply_to: Some(form.email.trim().to_string()),
    }
}

fn or_dash(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => escape_html(v),
        _ => "-".to_string(),
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render a notification and hand it to the transport.
pub async fn send_notification<M: Mailer>(
    mailer: &M,
    notification: &Notification,
) -> Result<(), AppError> {
    let email = notification.render();
    tracing::info!(kind = notification.kind(), subject = %email.subject, "Sending notification");
    mailer.send(&email).await
}
