use async_trait::async_trait;

use super::client::HttpClient;

/// Plain pass-through [`HttpClient`] over a [`reqwest::Client`].
pub struct BasicClient(reqwest::Client);

impl BasicClient {
    pub fn new() -> Self {
        Self(reqwest::Client::new())
    }

    /// Wraps an already-configured client (timeouts etc.).
    pub fn from_client(client: reqwest::Client) -> Self {
        Self(client)
    }
}

impl Default for BasicClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpClient for BasicClient {
    async fn execute(&self, req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        self.0.execute(req).await
    }
}
