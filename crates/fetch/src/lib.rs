//! Fetching units from a units endpoint, with retries, fallback data and a
//! short lived cache.

use std::{error, fmt, sync::Arc};

pub mod cache;
pub mod http;
pub mod retry;
pub mod sample;

pub use cache::CachedFetcher;
pub use http::{HttpClient, ReqwestClient};
pub use retry::{Fetcher, RetryPolicy};

/// Failure of a single request. Every variant is worth retrying.
#[derive(Debug, Clone)]
pub enum FetchError {
    RequestError(Arc<reqwest::Error>),
    InvalidResponse {
        status_code: reqwest::StatusCode,
        url: String,
    },
    Other(String),
}

impl error::Error for FetchError {}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FetchError::RequestError(e) => write!(f, "HTTP request error: {}", e),
            FetchError::InvalidResponse { status_code, url } => {
                write!(f, "Invalid Response ({}) {}", status_code, url)
            }
            FetchError::Other(e) => write!(f, "{e}"),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        FetchError::RequestError(Arc::new(e))
    }
}
