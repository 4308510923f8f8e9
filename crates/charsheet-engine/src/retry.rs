//! Opt-in retry around a [`ProfileGenerator`].
//!
//! [`ProfileService`](crate::service::ProfileService) never retries on its
//! own. Operators who want retries wrap their generator in
//! [`RetryingGenerator`]; only errors for which
//! [`ProviderError::is_retryable`] holds are retried.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::provider::{GenerationRequest, ProfileGenerator, ProviderError};

/// Tunable parameters for the backoff strategy.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Extra attempts after the first. Zero disables retrying.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// Next backoff delay, clamped to [`RetryPolicy::max_delay`].
pub fn next_delay(current: Duration, policy: &RetryPolicy) -> Duration {
    let next_ms = (current.as_millis() as f64 * policy.multiplier) as u64;
    Duration::from_millis(next_ms).min(policy.max_delay)
}

pub struct RetryingGenerator<G> {
    inner: G,
    policy: RetryPolicy,
}

impl<G: ProfileGenerator> RetryingGenerator<G> {
    pub fn new(inner: G, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl<G: ProfileGenerator> ProfileGenerator for RetryingGenerator<G> {
    async fn generate(&self, req: &GenerationRequest) -> Result<Value, ProviderError> {
        let mut delay = self.policy.initial_delay;
        let mut attempt = 0u32;
        loop {
            match self.inner.generate(req).await {
                Ok(v) => return Ok(v),
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let wait = e
                        .retry_after_secs
                        .map(Duration::from_secs)
                        .unwrap_or(delay)
                        .min(self.policy.max_delay);
                    tracing::warn!(
                        generator = self.inner.name(),
                        attempt,
                        delay_ms = wait.as_millis() as u64,
                        "retryable provider error: {e}"
                    );
                    tokio::time::sleep(wait).await;
                    delay = next_delay(delay, &self.policy);
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReasoningEffort;
    use crate::provider::ProviderErrorKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Fails with `kind` for the first `failures` calls, then succeeds.
    struct Flaky {
        failures: u32,
        kind: ProviderErrorKind,
        calls: AtomicU32,
    }

    #[async_trait]
    impl ProfileGenerator for Flaky {
        async fn generate(&self, _req: &GenerationRequest) -> Result<Value, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(ProviderError::new(self.kind, "flaky"))
            } else {
                Ok(json!({ "ok": true }))
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn flaky(failures: u32, kind: ProviderErrorKind) -> Flaky {
        Flaky {
            failures,
            kind,
            calls: AtomicU32::new(0),
        }
    }

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
        }
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            instruction: "".into(),
            name: "x".into(),
            schema: Arc::new(Value::Null),
            model: "m".into(),
            reasoning_effort: ReasoningEffort::Low,
        }
    }

    #[test]
    fn delay_grows_and_clamps() {
        let p = RetryPolicy::default();
        assert_eq!(next_delay(Duration::from_secs(1), &p), Duration::from_secs(2));
        assert_eq!(next_delay(Duration::from_secs(20), &p), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn retries_transient_errors() {
        let g = RetryingGenerator::new(flaky(2, ProviderErrorKind::ServerError), fast(3));
        assert!(g.generate(&request()).await.is_ok());
        assert_eq!(g.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_retries() {
        let g = RetryingGenerator::new(flaky(5, ProviderErrorKind::Network), fast(2));
        let err = g.generate(&request()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Network);
        assert_eq!(g.inner.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn never_retries_permanent_errors() {
        for kind in [
            ProviderErrorKind::Auth,
            ProviderErrorKind::Refused,
            ProviderErrorKind::InvalidResponse,
        ] {
            let g = RetryingGenerator::new(flaky(1, kind), fast(3));
            assert!(g.generate(&request()).await.is_err());
            assert_eq!(g.inner.calls.load(Ordering::SeqCst), 1, "{kind:?}");
        }
    }

    #[tokio::test]
    async fn default_policy_does_not_retry() {
        let g = RetryingGenerator::new(
            flaky(1, ProviderErrorKind::Timeout),
            RetryPolicy::default(),
        );
        assert!(g.generate(&request()).await.is_err());
        assert_eq!(g.inner.calls.load(Ordering::SeqCst), 1);
    }
}
