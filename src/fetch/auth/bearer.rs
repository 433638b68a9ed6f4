use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderValue};

use crate::fetch::client::HttpClient;

/// An [`HttpClient`] wrapper that sets `Authorization: Bearer <token>` on
/// every request. One token covers a whole run; there is no refresh.
pub struct Bearer<C> {
    inner: C,
    header_value: HeaderValue,
}

impl<C> Bearer<C> {
    pub fn new(inner: C, token: &str) -> Result<Self> {
        let header_value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        Ok(Self {
            inner,
            header_value,
        })
    }
}

#[async_trait]
impl<C: HttpClient> HttpClient for Bearer<C> {
    async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        req.headers_mut()
            .insert(AUTHORIZATION, self.header_value.clone());
        self.inner.execute(req).await
    }
}
