use crate::errors::ApiError;
use crate::models::{JournalEntry, NewEntry, Stats};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// The four operations the journal service exposes. Everything that talks
/// to the network sits behind this seam so the rest of the client can be
/// exercised against an in-memory implementation.
pub trait SentimentApi: Send + Sync {
    /// True iff the service answers its health endpoint with a 2xx status.
    /// Failures stop here; this never returns an error.
    fn check_health(&self) -> impl Future<Output = bool> + Send;

    fn create_entry(&self, entry: NewEntry)
    -> impl Future<Output = Result<JournalEntry, ApiError>> + Send;

    /// Entries in delivery order; the client does not assume any sort.
    fn list_entries(&self) -> impl Future<Output = Result<Vec<JournalEntry>, ApiError>> + Send;

    fn fetch_stats(&self) -> impl Future<Output = Result<Stats, ApiError>> + Send;
}

/// Bounded startup readiness probe: retry the health check a fixed number
/// of times with a fixed delay, then give up.
pub async fn wait_until_healthy(api: &impl SentimentApi, attempts: u32, delay: Duration) -> bool {
    for attempt in 1..=attempts {
        if api.check_health().await {
            debug!("journal service healthy after {attempt} attempt(s)");
            return true;
        }
        if attempt < attempts {
            sleep(delay).await;
        }
    }
    warn!("journal service not reachable after {attempts} attempts");
    false
}

/// reqwest-backed client against a configured base URL.
#[derive(Clone)]
pub struct HttpApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|err| ApiError::BadResponse(err.to_string()))
    }
}

impl SentimentApi for HttpApi {
    async fn check_health(&self) -> bool {
        match self.client.get(self.url("/api/health")).send().await {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                debug!("health check failed: {err}");
                false
            }
        }
    }

    async fn create_entry(&self, entry: NewEntry) -> Result<JournalEntry, ApiError> {
        let response = self
            .client
            .post(self.url("/api/entries"))
            .json(&entry)
            .send()
            .await
            .map_err(|err| ApiError::Unreachable(err.to_string()))?;
        Self::read_json(response).await
    }

    async fn list_entries(&self) -> Result<Vec<JournalEntry>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/entries"))
            .send()
            .await
            .map_err(|err| ApiError::Unreachable(err.to_string()))?;
        Self::read_json(response).await
    }

    async fn fetch_stats(&self) -> Result<Stats, ApiError> {
        let response = self
            .client
            .get(self.url("/api/stats"))
            .send()
            .await
            .map_err(|err| ApiError::Unreachable(err.to_string()))?;
        Self::read_json(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slashes_are_stripped() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/api/health"), "http://localhost:5000/api/health");
    }
}
