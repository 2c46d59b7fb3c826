use std::time::Instant;

use reqwest::Client;
use serde_json::Value;

use crate::core::error::UpstreamError;
use crate::infra::config::UnipileConfig;
use crate::infra::http::headers::add_standard_headers;
use crate::infra::runtime::limits::make_http_client;

/// Unipile messaging adapter (Telegram). Reads go through `get`; sending a message
/// is a multipart POST whose content-type (and boundary) comes from the form encoder,
/// never set by hand.
#[derive(Clone)]
pub struct UnipileClient {
    dsn: String,
    api_key: String,
    http: Client,
}

impl UnipileClient {
    pub fn new(cfg: &UnipileConfig) -> Self {
        Self {
            dsn: cfg.dsn.clone(),
            api_key: cfg.api_key.clone(),
            http: make_http_client(),
        }
    }

    pub async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Value, UpstreamError> {
        let url = format!("{}/api/v1{}", self.dsn.trim_end_matches('/'), path);
        tracing::debug!(path = path, "unipile GET");

        let mut builder = self
            .http
            .get(url)
            .header("X-API-KEY", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        let (builder, _rid) = add_standard_headers(builder, None);

        let start = Instant::now();
        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                crate::infra::logging::log_metric("unipile.get", "remote_error_total", 1.0);
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            crate::infra::logging::log_metric("unipile.get", "remote_error_total", 1.0);
            return Err(UpstreamError::status(
                format!("Unipile GET {path}"),
                status,
                body,
            ));
        }

        let data = resp.json::<Value>().await?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("unipile.get", "remote_latency_ms", elapsed_ms);
        Ok(data)
    }

    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Value, UpstreamError> {
        let url = format!(
            "{}/api/v1/chats/{}/messages",
            self.dsn.trim_end_matches('/'),
            chat_id
        );
        tracing::debug!(chat_id = chat_id, "unipile send message");

        let form = reqwest::multipart::Form::new().text("text", text.to_owned());
        let (builder, _rid) = add_standard_headers(
            self.http
                .post(url)
                .header("X-API-KEY", &self.api_key)
                .multipart(form),
            None,
        );

        let start = Instant::now();
        let resp = match builder.send().await {
            Ok(r) => r,
            Err(e) => {
                crate::infra::logging::log_metric("unipile.send", "remote_error_total", 1.0);
                return Err(e.into());
            }
        };

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            crate::infra::logging::log_metric("unipile.send", "remote_error_total", 1.0);
            return Err(UpstreamError::status(
                "Unipile POST message",
                status,
                body,
            ));
        }

        let data = resp.json::<Value>().await?;
        let elapsed_ms = start.elapsed().as_millis() as f64;
        crate::infra::logging::log_metric("unipile.send", "remote_latency_ms", elapsed_ms);
        Ok(data)
    }
}
