//! HTTP seam between the refresh logic and the network.
//!
//! Every non-2xx status is returned as a normal [`HttpResponse`]; only
//! failures to obtain a response at all become errors.

mod reqwest_client;
#[cfg(test)]
pub(crate) mod stub;

use std::future::Future;

use crate::screen::errors::RefreshError;

pub use reqwest_client::ReqwestTransport;

/// Which endpoint a request targets. Selects timeout and redirect policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Api,
    Image,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub kind: RequestKind,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl HttpRequest {
    pub fn get(kind: RequestKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs GET requests on behalf of the screen controller.
pub trait HttpTransport: Send + Sync + 'static {
    /// Fails only with [`RefreshError::Network`].
    fn get(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, RefreshError>> + Send;
}
