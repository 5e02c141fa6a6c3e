use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::debug;

use super::{HttpRequest, HttpResponse, HttpTransport, RequestKind};
use crate::config::TrmnlConfig;
use crate::errors::ConfigError;
use crate::screen::errors::RefreshError;

/// [`HttpTransport`] backed by two reqwest clients, one per endpoint, since
/// timeouts and redirect policy are client-level settings.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    api: reqwest::Client,
    image: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(config: &TrmnlConfig) -> Result<Self, ConfigError> {
        let api = reqwest::Client::builder()
            .timeout(config.api.timeout())
            .build()
            .map_err(client_build_error)?;

        let image = reqwest::Client::builder()
            .timeout(config.image.timeout())
            .redirect(Policy::limited(config.image.max_redirects()))
            .build()
            .map_err(client_build_error)?;

        Ok(Self { api, image })
    }

    fn client(&self, kind: RequestKind) -> &reqwest::Client {
        match kind {
            RequestKind::Api => &self.api,
            RequestKind::Image => &self.image,
        }
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, RefreshError> {
        let mut builder = self.client(request.kind).get(&request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(network_error)?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(network_error)?.to_vec();

        debug!(
            event = "core.transport.response_received",
            kind = ?request.kind,
            status = status,
            bytes = body.len()
        );

        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn client_build_error(e: reqwest::Error) -> ConfigError {
    ConfigError::HttpClientBuild {
        message: e.to_string(),
    }
}

/// Flatten the error chain; reqwest's top-level message rarely names the cause.
fn network_error(e: reqwest::Error) -> RefreshError {
    let mut message = e.to_string();
    let mut source = std::error::Error::source(&e);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    RefreshError::Network { message }
}
