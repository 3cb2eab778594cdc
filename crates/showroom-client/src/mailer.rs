use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use showroom_core::error::AppError;
use showroom_core::notify::Email;
use showroom_core::traits::Mailer;
use url::Url;

const DEFAULT_API_URL: &str = "https://api.resend.com";
const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Mail transport credentials plus the fixed sender and recipient.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub api_key: String,
    pub api_url: String,
    /// Sender address, e.g. `Showroom <noreply@dealer.example>`.
    pub from: String,
    /// Staff inbox that receives storefront notifications.
    pub to: String,
}

impl MailerConfig {
    /// Read configuration from environment variables.
    ///
    /// - `MAIL_API_KEY`, `MAIL_FROM`, `MAIL_TO` (required)
    /// - `MAIL_API_URL` (optional)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                AppError::ConfigError(format!("{key} not set. Required for email notifications."))
            })
        };

        let api_url = lookup("MAIL_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Url::parse(&api_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid MAIL_API_URL '{api_url}': {e}")))?;

        let to = required("MAIL_TO")?;
        if !to.contains('@') {
            return Err(AppError::ConfigError(format!(
                "MAIL_TO '{to}' is not an email address"
            )));
        }

        Ok(Self {
            api_key: required("MAIL_API_KEY")?,
            api_url,
            from: required("MAIL_FROM")?,
            to,
        })
    }
}

/// Transactional email client speaking a JSON-over-HTTP send API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    config: MailerConfig,
    timeout_secs: u64,
}

impl HttpMailer {
    pub fn new(config: MailerConfig) -> Result<Self, AppError> {
        Self::with_timeout(config, DEFAULT_SEND_TIMEOUT)
    }

    pub fn with_timeout(mut config: MailerConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        config.api_url = config.api_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            config,
            timeout_secs: timeout.as_secs(),
        })
    }

    pub fn recipient(&self) -> &str {
        &self.config.to
    }
}

// ---- Transport API types ----

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: Vec<&'a str>,
    subject: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

#[derive(Deserialize)]
struct SendResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl Mailer for HttpMailer {
    async fn send(&self, email: &Email) -> Result<(), AppError> {
        let url = format!("{}/emails", self.config.api_url);

        let request = SendRequest {
            from: &self.config.from,
            to: vec![self.config.to.as_str()],
            subject: &email.subject,
            html: &email.html,
            reply_to: email.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::Timeout(self.timeout_secs)
                } else if e.is_connect() {
                    AppError::NetworkError(format!("Connection failed: {e}"))
                } else {
                    AppError::HttpError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let status_code = status.as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|e| e.message)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

            return Err(AppError::MailError {
                message,
                status_code,
            });
        }

        // The id is informational only; a 2xx without a parseable body still counts as sent.
        let sent = response.json::<SendResponse>().await.ok().and_then(|r| r.id);
        tracing::info!(message_id = ?sent, to = %self.config.to, "Email dispatched");

        Ok(())
    }
}
