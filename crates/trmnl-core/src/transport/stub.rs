use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;

use super::{HttpRequest, HttpResponse, HttpTransport};
use crate::screen::errors::RefreshError;

#[derive(Clone)]
enum StubReply {
    Response(HttpResponse),
    /// Held until the gate is notified.
    Gated(HttpResponse, Arc<Notify>),
    Error(String),
}

fn response(status: u16, content_type: Option<&str>, body: impl Into<Vec<u8>>) -> HttpResponse {
    HttpResponse {
        status,
        content_type: content_type.map(str::to_string),
        body: body.into(),
    }
}

/// Canned replies keyed by URL. Unknown URLs fail like an unreachable host.
#[derive(Default)]
pub(crate) struct StubTransport {
    routes: Mutex<HashMap<String, StubReply>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(
        &self,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) {
        let reply = StubReply::Response(response(status, content_type, body));
        self.routes.lock().unwrap().insert(url.to_string(), reply);
    }

    /// Like [`respond`](Self::respond), but the reply is only delivered once
    /// `gate` is notified. Requests already waiting keep this reply even if
    /// the route is replaced meanwhile.
    pub(crate) fn respond_after(
        &self,
        gate: Arc<Notify>,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: impl Into<Vec<u8>>,
    ) {
        let reply = StubReply::Gated(response(status, content_type, body), gate);
        self.routes.lock().unwrap().insert(url.to_string(), reply);
    }

    pub(crate) fn fail(&self, url: &str, message: &str) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), StubReply::Error(message.to_string()));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl HttpTransport for StubTransport {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, RefreshError> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self.routes.lock().unwrap().get(&request.url).cloned();
        match reply {
            Some(StubReply::Response(response)) => Ok(response),
            Some(StubReply::Gated(response, gate)) => {
                gate.notified().await;
                Ok(response)
            }
            Some(StubReply::Error(message)) => Err(RefreshError::Network { message }),
            None => Err(RefreshError::Network {
                message: format!("no route to {}", request.url),
            }),
        }
    }
}
