use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{info, warn};

use super::errors::RefreshError;
use crate::transport::{HttpRequest, HttpTransport, RequestKind};

/// Media type assumed when the image response carries no content-type.
pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/png";

/// Downloads the screen image and encodes it as a `data:` URI.
pub struct ImageFetcher<T> {
    transport: Arc<T>,
}

impl<T: HttpTransport> ImageFetcher<T> {
    pub fn new(transport: Arc<T>) -> Self {
        Self { transport }
    }

    /// Fetch `url` and return `data:<content-type>;base64,<payload>`.
    ///
    /// Redirects and timeout are enforced by the transport. Caches are
    /// bypassed so a changed screen behind the same URL is picked up.
    pub async fn fetch(&self, url: &str) -> Result<String, RefreshError> {
        let request = HttpRequest::get(RequestKind::Image, url)
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache");

        let response = self.transport.get(request).await?;
        if !response.is_success() {
            warn!(
                event = "core.image.fetch_http_error",
                url = url,
                status = response.status
            );
            return Err(RefreshError::ImageHttp {
                status: response.status,
            });
        }

        let content_type = response
            .content_type
            .as_deref()
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);

        info!(
            event = "core.image.fetch_completed",
            url = url,
            content_type = content_type,
            bytes = response.body.len()
        );

        Ok(encode_data_url(content_type, &response.body))
    }
}

pub fn encode_data_url(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, BASE64.encode(bytes))
}

/// Split a `data:<mime>;base64,<payload>` string back into media type and bytes.
///
/// Returns `None` for anything that is not a base64 data URI.
pub fn decode_data_url(data_url: &str) -> Option<(String, Vec<u8>)> {
    let rest = data_url.strip_prefix("data:")?;
    let (content_type, payload) = rest.split_once(";base64,")?;
    let bytes = BASE64.decode(payload).ok()?;
    Some((content_type.to_string(), bytes))
}
