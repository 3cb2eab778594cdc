use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use showroom_core::error::AppError;
use showroom_core::images::InlineImage;
use showroom_core::traits::ImageHost;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://api.cloudinary.com/v1_1";
const DEFAULT_FOLDER: &str = "car-listings";
const DEFAULT_UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Credentials and endpoint for the image hosting service.
#[derive(Debug, Clone)]
pub struct HostingConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub base_url: String,
}

impl HostingConfig {
    /// Read configuration from environment variables.
    ///
    /// - `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`, `CLOUDINARY_API_SECRET` (required)
    /// - `CLOUDINARY_FOLDER` (optional, defaults to `car-listings`)
    /// - `CLOUDINARY_BASE_URL` (optional, defaults to the public API)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let required = |key: &str| {
            lookup(key).filter(|v| !v.trim().is_empty()).ok_or_else(|| {
                AppError::ConfigError(format!("{key} not set. Required for image uploads."))
            })
        };

        let base_url =
            lookup("CLOUDINARY_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|e| {
            AppError::ConfigError(format!("Invalid CLOUDINARY_BASE_URL '{base_url}': {e}"))
        })?;

        Ok(Self {
            cloud_name: required("CLOUDINARY_CLOUD_NAME")?,
            api_key: required("CLOUDINARY_API_KEY")?,
            api_secret: required("CLOUDINARY_API_SECRET")?,
            folder: lookup("CLOUDINARY_FOLDER").unwrap_or_else(|| DEFAULT_FOLDER.to_string()),
            base_url,
        })
    }
}

/// Cloudinary client performing signed uploads of base64 data URIs.
#[derive(Clone)]
pub struct CloudinaryUploader {
    client: Client,
    config: HostingConfig,
    timeout_secs: u64,
}

impl CloudinaryUploader {
    pub fn new(config: HostingConfig) -> Result<Self, AppError> {
        Self::with_timeout(config, DEFAULT_UPLOAD_TIMEOUT)
    }

    pub fn with_timeout(mut config: HostingConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent("Showroom/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::HttpError(e.to_string()))?;

        config.base_url = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            config,
            timeout_secs: timeout.as_secs(),
        })
    }

    fn upload_url(&self) -> String {
        format!("{}/{}/image/upload", self.config.base_url, self.config.cloud_name)
    }
}

/// SHA-256 request signature: sorted `key=value` pairs joined by `&`,
/// immediately followed by the API secret.
pub(crate) fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let to_sign = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(secret.as_bytes());
    format!("{:x}", hasher.finalize())
}

// ---- Cloudinary API types ----

#[derive(Serialize)]
struct UploadRequest<'a> {
    file: String,
    api_key: &'a str,
    timestamp: String,
    folder: &'a str,
    signature: String,
    signature_algorithm: &'static str,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ImageHost for CloudinaryUploader {
    async fn upload(&self, image: &InlineImage) -> Result<String, AppError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("folder", self.config.folder.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let request = UploadRequest {
            file: image.to_data_uri(),
            api_key: &self.config.api_key,
            timestamp,
            folder: &self.config.folder,
            signature,
            signature_algorithm: "sha256",
        };

        let response = self
            .client
            .post(self.upload_url())
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
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("HTTP {status_code}: {body}"));

            return Err(AppError::HostingError {
                message,
                status_code,
            });
        }

        let uploaded: UploadResponse = response.json().await.map_err(|e| AppError::HostingError {
            message: format!("Failed to parse upload response: {e}"),
            status_code: status.as_u16(),
        })?;

        Ok(uploaded.secure_url)
    }
}
