use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::join_all;

use crate::error::AppError;
use crate::models::PLACEHOLDER_IMAGE;
use crate::traits::ImageHost;

/// Base64 image data captured by the browser uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineImage {
    /// MIME type from the data URI, e.g. `image/jpeg`.
    pub mime: String,
    /// Base64 payload without the `data:...;base64,` prefix.
    pub data: String,
}

impl InlineImage {
    /// Re-assemble the data URI form, which hosting services accept directly.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.data)
    }

    /// Decoded size in bytes. Fails if the payload is not valid base64.
    pub fn decoded_len(&self) -> Result<usize, AppError> {
        STANDARD
            .decode(self.data.as_bytes())
            .map(|bytes| bytes.len())
            .map_err(|e| AppError::ValidationError(format!("Invalid base64 image data: {e}")))
    }
}

/// One entry of a listing's `images` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Already hosted somewhere; kept as-is.
    Remote(String),
    /// Needs uploading.
    Inline(InlineImage),
}

impl ImageSource {
    /// Classify a raw entry. Blank entries yield `None`.
    pub fn classify(entry: &str) -> Option<Self> {
        let entry = entry.trim();
        if entry.is_empty() {
            return None;
        }

        let inline = entry
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(";base64,"))
            .map(|(mime, data)| InlineImage {
                mime: if mime.is_empty() {
                    "application/octet-stream".to_string()
                } else {
                    mime.to_string()
                },
                data: data.to_string(),
            });

        Some(match inline {
            Some(image) => ImageSource::Inline(image),
            None => ImageSource::Remote(entry.to_string()),
        })
    }
}

/// Turn a listing's raw image entries into hosted URLs.
///
/// Inline images are uploaded concurrently and replaced by the URL the host
/// returns. Remote URLs pass through. Array order is preserved. An image that
/// fails validation or upload is dropped with a warning instead of failing
/// the whole listing. If nothing usable remains the placeholder is returned.
pub async fn resolve_images<H: ImageHost>(host: &H, entries: &[String]) -> Vec<String> {
    let uploads = entries
        .iter()
        .filter_map(|entry| ImageSource::classify(entry))
        .enumerate()
        .map(|(index, source)| async move {
            match source {
                ImageSource::Remote(url) => Some(url),
                ImageSource::Inline(image) => {
                    if let Err(e) = image.decoded_len() {
                        tracing::warn!(index, error = %e, "Dropping image with invalid base64");
                        return None;
                    }
                    match host.upload(&image).await {
                        Ok(url) => {
                            tracing::debug!(index, %url, "Image uploaded");
                            Some(url)
                        }
                        Err(e) => {
                            tracing::warn!(index, error = %e, "Image upload failed, dropping it");
                            None
                        }
                    }
                }
            }
        });

    let resolved: Vec<String> = join_all(uploads).await.into_iter().flatten().collect();

    if resolved.is_empty() {
        vec![PLACEHOLDER_IMAGE.to_string()]
    } else {
        resolved
    }
}
