use std::time::Duration;

/// Build a reqwest client with sane defaults. A hung upstream should fail the
/// invocation instead of hanging it forever.
pub fn make_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(2))
        .timeout(Duration::from_secs(6))
        .build()
        .unwrap_or_default()
}
