use std::time::Instant;

use reqwest::Client;
use serde_json::{Map, Value};

use crate::core::error::UpstreamError;
use crate::infra::config::DoctocConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

/// Doctoc platform adapter. Every endpoint is a POST of a JSON payload; the
/// configured organization id is stamped onto the payload last, so a caller-supplied
/// `orgID` can never reach the upstream.
#[derive(Clone)]
pub struct DoctocClient {
    base: String,
    token: String,
    org_id: String,
    http: Client,
}

impl DoctocClient {
    pub fn new(cfg: &DoctocConfig) -> Self {
        Self {
            base: cfg.base_url.clone(),
            token: cfg.api_token.clone(),
            org_id: cfg.org_id.clone(),
            http: make_http_client(),
        }
    }

    pub async fn call(
        &self,
        endpoint: &str,
        mut payload: Map<String, Value>,
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/{}", self.base.trim_end_matches('/'), endpoint);
        payload.insert("orgID".to_string(), Value::String(self.org_id.clone()));
        tracing::debug!(endpoint = endpoint, "doctoc request");

        let start = Instant::now();
        let (builder, _rid) = add_standard_headers(
            self.http.post(url).bearer_auth(&self.token).json(&payload),
            None,
        );
        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                crate::infra::logging::log_metric("doctoc.call", "remote_error_total", 1.0);
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            crate::infra::logging::log_metric("doctoc.call", "remote_error_total", 1.0);
            return Err(UpstreamError::status(
                format!("Doctoc {endpoint}"),
                status,
                body,
            ));
        }

        let data = resp.json::<Value>().await?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("doctoc.call", "remote_latency_ms", elapsed_ms);
        Ok(data)
    }
}
