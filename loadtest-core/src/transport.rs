use std::fmt;
use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use loadtest_http::{HttpClient, HttpRequest};
use tracing::debug;

use crate::runner::RunConfig;
use crate::scenario::Scenario;

/// Effective parameters of one request.
///
/// Built per call, either from the run configuration or from a picked scenario, and never
/// written back to shared state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestSpec {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl RequestSpec {
    pub fn from_config(cfg: &RunConfig) -> Self {
        Self::new(&cfg.method, &cfg.target_url, &cfg.headers, &cfg.payload)
    }

    pub fn from_scenario(scenario: &Scenario) -> Self {
        Self::new(
            &scenario.method,
            &scenario.endpoint,
            &scenario.headers,
            &scenario.payload,
        )
    }

    fn new<'a>(
        method: &str,
        url: &str,
        headers: impl IntoIterator<Item = (&'a String, &'a String)>,
        payload: &str,
    ) -> Self {
        let method = if method.trim().is_empty() {
            "GET".to_string()
        } else {
            method.to_string()
        };

        Self {
            method,
            url: url.to_string(),
            headers: headers
                .into_iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            body: Bytes::copy_from_slice(payload.as_bytes()),
        }
    }
}

/// Sends one request and reports the response status.
///
/// Any returned status, including 4xx/5xx, is a completed exchange. `Err` is reserved for
/// transport-level failures (connect, timeout, invalid request, ...).
pub trait Transport: Send + Sync + 'static {
    type Error: fmt::Display + Send;

    fn send(
        &self,
        req: RequestSpec,
        timeout: Duration,
    ) -> impl Future<Output = Result<u16, Self::Error>> + Send;
}

impl Transport for HttpClient {
    type Error = loadtest_http::Error;

    async fn send(&self, req: RequestSpec, timeout: Duration) -> Result<u16, Self::Error> {
        let url = req.url.clone();
        let res = match HttpRequest::with_method_str(&req.method, &req.url, req.body) {
            Ok(r) => self.request(r.with_headers(req.headers).with_timeout(timeout)).await,
            Err(err) => Err(err),
        };

        res.map(|r| r.status).inspect_err(|err| {
            debug!(kind = %err.transport_error_kind(), %url, "http transport error");
        })
    }
}
