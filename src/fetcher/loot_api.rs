use reqwest::Client;
use std::collections::BTreeMap;
use std::future::Future;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::errors::{RarityError, Result};
use crate::models::{Bag, Slot};

/// Anything that can hand out one bag by id. Failures are treated as
/// transient by `fetch_with_retry`.
pub trait LootSource {
    fn fetch_bag(&mut self, id: u32) -> impl Future<Output = Result<Bag>> + Send;
}

/// Fetches one bag, retrying exactly once on failure. No backoff.
pub async fn fetch_with_retry<S: LootSource>(source: &mut S, id: u32) -> Result<Bag> {
    match source.fetch_bag(id).await {
        Ok(bag) => Ok(bag),
        Err(e) => {
            warn!("Fetching bag {} failed: {}", id, e);
            warn!("Retrying: {}", id);
            source.fetch_bag(id).await
        }
    }
}

/// HTTP loot source: `GET {base_url}/bags/{id}` answers with a JSON object
/// of slot name to item name.
pub struct LootApiClient {
    client: Client,
    base_url: String,
    last_request: Instant,
    rate_limit_delay: Duration,
}

impl LootApiClient {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
            last_request: Instant::now(),
            rate_limit_delay: Duration::from_millis(100),
        }
    }

    pub fn with_rate_limit(mut self, delay: Duration) -> Self {
        self.rate_limit_delay = delay;
        self
    }

    fn bag_url(&self, id: u32) -> String {
        format!("{}/bags/{}", self.base_url.trim_end_matches('/'), id)
    }

    async fn respect_rate_limit(&self, delay: Duration) {
        let elapsed = self.last_request.elapsed();
        if elapsed < delay {
            tokio::time::sleep(delay - elapsed).await;
        }
    }
}

impl LootSource for LootApiClient {
    async fn fetch_bag(&mut self, id: u32) -> Result<Bag> {
        // Jitter so consecutive runs don't line up on the same boundaries.
        let delay = self.rate_limit_delay + Duration::from_millis(rand::random::<u64>() % 100);
        self.respect_rate_limit(delay).await;

        let url = self.bag_url(id);
        debug!("Fetching bag from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await?;
        self.last_request = Instant::now();

        let status = response.status();
        if !status.is_success() {
            return Err(RarityError::ApiError(format!(
                "Bag {} request returned {}",
                id, status
            )));
        }

        let slots: BTreeMap<Slot, String> = response.json().await?;
        Ok(Bag { id, slots })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fails the first `failures` calls, then succeeds.
    struct FlakySource {
        failures: u32,
        calls: u32,
    }

    impl LootSource for FlakySource {
        async fn fetch_bag(&mut self, id: u32) -> Result<Bag> {
            self.calls += 1;
            if self.calls <= self.failures {
                return Err(RarityError::ApiError("connection reset".to_string()));
            }
            Ok(Bag::new(id).with_item(Slot::Vehicle, "Golf Cart"))
        }
    }

    #[tokio::test]
    async fn test_retry_recovers_from_one_failure() {
        let mut source = FlakySource { failures: 1, calls: 0 };
        let bag = fetch_with_retry(&mut source, 5).await.unwrap();

        assert_eq!(bag.id, 5);
        assert_eq!(source.calls, 2);
    }

    #[tokio::test]
    async fn test_retry_gives_up_after_second_failure() {
        let mut source = FlakySource { failures: 2, calls: 0 };
        let err = fetch_with_retry(&mut source, 5).await.unwrap_err();

        assert!(matches!(err, RarityError::ApiError(_)));
        assert_eq!(source.calls, 2);
    }

    #[tokio::test]
    async fn test_success_makes_a_single_call() {
        let mut source = FlakySource { failures: 0, calls: 0 };
        fetch_with_retry(&mut source, 1).await.unwrap();
        assert_eq!(source.calls, 1);
    }

    #[test]
    fn test_bag_url_trims_trailing_slash() {
        let client = LootApiClient::new("http://localhost:8080/".to_string());
        assert_eq!(client.bag_url(42), "http://localhost:8080/bags/42");
    }
}
