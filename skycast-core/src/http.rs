//! Time-bounded GET requests.
//!
//! Every provider call goes through [`BoundedClient::get`], which races the
//! request (headers and body) against a timer. When the timer wins, the
//! request future is dropped, which tears down the underlying connection
//! instead of leaving it running in the background.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::FetchError;

#[derive(Debug, Clone)]
pub struct BoundedClient {
    http: Client,
    budget: Duration,
}

/// Status and body of a response that settled within budget.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: String,
}

impl BoundedClient {
    pub fn new(budget: Duration) -> Self {
        Self {
            http: Client::new(),
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// GET `url` with `query` appended. Fails with a timed-out
    /// [`FetchError::Network`] if nothing settles within the budget.
    pub async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<RawResponse, FetchError> {
        let attempt = async {
            let res = self
                .http
                .get(url)
                .query(query)
                .send()
                .await
                .map_err(|e| FetchError::transport(&e))?;

            let status = res.status();
            let body = res.text().await.map_err(|e| FetchError::transport(&e))?;

            Ok(RawResponse { status, body })
        };

        match tokio::time::timeout(self.budget, attempt).await {
            Ok(result) => result,
            Err(_) => {
                let budget_ms = self.budget.as_millis() as u64;
                tracing::debug!(url, budget_ms, "request timed out");
                Err(FetchError::timeout(self.budget))
            }
        }
    }
}

impl RawResponse {
    /// Check the status, then parse the body as `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        if !self.status.is_success() {
            return Err(FetchError::Provider {
                status: self.status.as_u16(),
                message: truncate_body(&self.body),
            });
        }

        serde_json::from_str(&self.body)
            .map_err(|e| FetchError::Parse(e.to_string()))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
