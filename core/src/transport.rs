//! Executes `HttpRequest` values against the network.
//!
//! The components never perform I/O themselves; whoever drives them hands
//! each built request to a `Transport` and feeds the outcome back. Only a
//! failure to obtain any response is an error here. 4xx/5xx responses are
//! returned as data so the client can read the service's envelope.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Outcome of one round trip, as fed back to a component's `finish_*` step.
pub type Outcome = Result<HttpResponse, ApiError>;

pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Outcome;
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// No timeout or retry policy is configured; ureq's defaults apply.
#[derive(Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Outcome {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let body = request.body.as_deref();
        let sent = match request.method {
            HttpMethod::Get => self.agent.get(&request.path).call(),
            HttpMethod::Delete => self.agent.delete(&request.path).call(),
            HttpMethod::Post => send(self.agent.post(&request.path), &request.headers, body),
            HttpMethod::Put => send(self.agent.put(&request.path), &request.headers, body),
            HttpMethod::Patch => send(self.agent.patch(&request.path), &request.headers, body),
        };
        let mut response = sent.map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

fn send(
    mut builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    headers: &[(String, String)],
    body: Option<&str>,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}
