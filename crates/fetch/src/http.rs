use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::FetchError;

/// HTTP GET returning a JSON body.
///
/// Implementations report timeouts, connection failures, non-2xx statuses
/// and bodies that are not JSON as `FetchError`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;
}

/// `HttpClient` backed by reqwest.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        let response = self.client.get(url).send().await?;

        let status_code = response.status();
        if !status_code.is_success() {
            return Err(FetchError::InvalidResponse {
                status_code,
                url: url.to_owned(),
            });
        }

        Ok(response.json().await?)
    }
}
