use async_trait::async_trait;
use reqwest::{Request, Response};

/// Seam between the pagination loop and the network. Tests script this with
/// canned responses; production wraps [`reqwest::Client`], optionally behind
/// an auth decorator.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
