//! Mock frame receiver for transport tests.

use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

/// Wrapper around wiremock MockServer standing in for the display
pub struct MockFrameReceiver {
    pub server: MockServer,
}

impl MockFrameReceiver {
    /// Start a new receiver
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get URL for a specific path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Accept octet-stream POSTs on `endpoint` with the given status
    pub async fn respond_with(&self, endpoint: &str, status: u16) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .and(header("content-type", "application/octet-stream"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// Respond after `delay_ms`, to exercise client timeouts
    pub async fn respond_slowly(&self, endpoint: &str, delay_ms: u64) {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(std::time::Duration::from_millis(delay_ms)),
            )
            .mount(&self.server)
            .await;
    }

    /// Bodies of every request received so far
    pub async fn received_bodies(&self) -> Vec<Vec<u8>> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.body)
            .collect()
    }

    /// Value of a header on the first received request
    pub async fn first_header(&self, name: &str) -> Option<String> {
        let requests = self.server.received_requests().await?;
        let request = requests.first()?;
        request
            .headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}
