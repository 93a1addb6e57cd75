use std::sync::Arc;

use crate::application::ports::status_store::{StatusStore, StatusStoreError};

/// Request budget for one client within one window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitPolicy {
    pub max_requests: i64,
    pub window_seconds: i64,
}

/// One upload per five minutes.
pub const UPLOAD_POLICY: RateLimitPolicy = RateLimitPolicy {
    max_requests: 1,
    window_seconds: 300,
};

/// Ten chat messages per minute.
pub const CHAT_POLICY: RateLimitPolicy = RateLimitPolicy {
    max_requests: 10,
    window_seconds: 60,
};

/// Per-client counters on the status store's atomic increment. No locks:
/// the store's own upsert keeps concurrent requests counted correctly.
pub struct RateLimiter {
    status_store: Arc<dyn StatusStore>,
}

impl RateLimiter {
    pub fn new(status_store: Arc<dyn StatusStore>) -> Self {
        Self { status_store }
    }

    /// Counts the request and reports whether it stays within the
    /// policy. The request is counted even when rejected, matching a
    /// sliding-window limiter that penalizes hammering.
    pub async fn allow(
        &self,
        bucket: &str,
        client_key: &str,
        policy: RateLimitPolicy,
    ) -> Result<bool, StatusStoreError> {
        let key = format!("rate:{}:{}", bucket, client_key);
        let count = self
            .status_store
            .increment_with_expiry(&key, policy.window_seconds)
            .await?;

        Ok(count <= policy.max_requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    struct WindowedStore {
        counters: Mutex<HashMap<String, (i64, Instant)>>,
    }

    impl WindowedStore {
        fn new() -> Self {
            Self {
                counters: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl StatusStore for WindowedStore {
        async fn set(&self, _key: &str, _value: &str) -> Result<(), StatusStoreError> {
            Ok(())
        }

        async fn get(&self, _key: &str) -> Result<Option<String>, StatusStoreError> {
            Ok(None)
        }

        async fn increment_with_expiry(
            &self,
            key: &str,
            window_seconds: i64,
        ) -> Result<i64, StatusStoreError> {
            let mut counters = self.counters.lock().unwrap();
            let now = Instant::now();
            let entry = counters.entry(key.to_string()).or_insert((0, now));

            if now.duration_since(entry.1) >= Duration::from_secs(window_seconds as u64) {
                *entry = (0, now);
            }
            entry.0 += 1;
            Ok(entry.0)
        }
    }

    #[tokio::test]
    async fn test_requests_within_budget_are_allowed() {
        let limiter = RateLimiter::new(Arc::new(WindowedStore::new()));

        for _ in 0..CHAT_POLICY.max_requests {
            assert!(limiter.allow("chat", "1.2.3.4", CHAT_POLICY).await.unwrap());
        }
        assert!(!limiter.allow("chat", "1.2.3.4", CHAT_POLICY).await.unwrap());
    }

    #[tokio::test]
    async fn test_clients_are_counted_separately() {
        let limiter = RateLimiter::new(Arc::new(WindowedStore::new()));

        assert!(limiter.allow("upload", "1.2.3.4", UPLOAD_POLICY).await.unwrap());
        assert!(!limiter.allow("upload", "1.2.3.4", UPLOAD_POLICY).await.unwrap());
        assert!(limiter.allow("upload", "5.6.7.8", UPLOAD_POLICY).await.unwrap());
    }

    #[tokio::test]
    async fn test_buckets_are_counted_separately() {
        let limiter = RateLimiter::new(Arc::new(WindowedStore::new()));

        assert!(limiter.allow("upload", "1.2.3.4", UPLOAD_POLICY).await.unwrap());
        assert!(limiter.allow("chat", "1.2.3.4", CHAT_POLICY).await.unwrap());
    }
}
