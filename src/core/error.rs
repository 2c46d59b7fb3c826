use thiserror::Error;

/// Failure of a single upstream call. Carried untouched to the envelope layer;
/// nothing here is retried.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Non-2xx response. `context` names the upstream operation
    /// (e.g. `Doctoc getPricesAPI`, `Unipile GET /chats`).
    #[error("{context} ({status}): {body}")]
    Status {
        context: String,
        status: u16,
        body: String,
    },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

impl UpstreamError {
    pub fn status(context: impl Into<String>, status: reqwest::StatusCode, body: String) -> Self {
        UpstreamError::Status {
            context: context.into(),
            status: status.as_u16(),
            body,
        }
    }
}
