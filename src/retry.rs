//! Bounded exponential backoff around pipeline invocations
//!
//! Only rate-limit failures are retried; everything else propagates
//! immediately. Exhausted retries surface as `Error::UpstreamUnavailable`,
//! which the HTTP layer maps to 503.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::chain::{AskOutcome, Pipeline};
use crate::error::{Error, Result};

/// Injectable delay so tests can observe the backoff schedule
/// without sleeping for real time.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Bounded-retry invocation policy for rate-limited upstream calls
pub struct RetryPolicy {
    max_attempts: u32,
    sleeper: Arc<dyn Sleeper>,
}

impl RetryPolicy {
    /// Create a policy with the given attempt bound (clamped to at least 1)
    pub fn new(max_attempts: u32) -> Self {
        Self::with_sleeper(max_attempts, Arc::new(TokioSleeper))
    }

    /// Create a policy with an injected sleeper
    pub fn with_sleeper(max_attempts: u32, sleeper: Arc<dyn Sleeper>) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            sleeper,
        }
    }

    /// Invoke `pipeline.ask`, retrying rate-limit failures with 1s, 2s, 4s, ...
    /// backoff until the attempt bound is reached.
    pub async fn invoke(&self, pipeline: &dyn Pipeline, question: &str) -> Result<AskOutcome> {
        for attempt in 0..self.max_attempts {
            match pipeline.ask(question).await {
                Ok(outcome) => return Ok(outcome),
                Err(e) if e.is_rate_limit() => {
                    if attempt + 1 < self.max_attempts {
                        let delay = Duration::from_secs(2u64.pow(attempt));
                        tracing::warn!(
                            "Rate limited (attempt {}/{}), retrying in {:?}",
                            attempt + 1,
                            self.max_attempts,
                            delay
                        );
                        self.sleeper.sleep(delay).await;
                    } else {
                        tracing::error!(
                            "Rate limit retries exhausted after {} attempts: {}",
                            self.max_attempts,
                            e
                        );
                    }
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::UpstreamUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySnapshot;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Pipeline that replays a scripted sequence of results
    struct ScriptedPipeline {
        script: Mutex<Vec<Result<AskOutcome>>>,
        calls: AtomicUsize,
    }

    impl ScriptedPipeline {
        fn new(script: Vec<Result<AskOutcome>>) -> Self {
            Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Pipeline for ScriptedPipeline {
        async fn ask(&self, _question: &str) -> Result<AskOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock();
            if script.is_empty() {
                panic!("scripted pipeline called more times than scripted");
            }
            script.remove(0)
        }

        fn memory_snapshot(&self) -> MemorySnapshot {
            MemorySnapshot::default()
        }

        fn reset_memory(&self) {}
    }

    /// Sleeper that records requested delays instead of sleeping
    struct RecordingSleeper {
        delays: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                delays: Mutex::new(Vec::new()),
            })
        }

        fn delays(&self) -> Vec<Duration> {
            self.delays.lock().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().push(duration);
        }
    }

    fn ok(answer: &str) -> Result<AskOutcome> {
        Ok(AskOutcome {
            answer: answer.to_string(),
        })
    }

    fn rate_limited() -> Result<AskOutcome> {
        Err(Error::RateLimited("HTTP 429".to_string()))
    }

    #[tokio::test]
    async fn test_success_returns_immediately() {
        let pipeline = ScriptedPipeline::new(vec![ok("fine")]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(3, sleeper.clone());

        let outcome = policy.invoke(&pipeline, "q").await.unwrap();
        assert_eq!(outcome.answer, "fine");
        assert_eq!(pipeline.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_non_rate_limit_failure_is_not_retried() {
        let pipeline =
            ScriptedPipeline::new(vec![Err(Error::Llm("connection refused".to_string()))]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(3, sleeper.clone());

        let err = policy.invoke(&pipeline, "q").await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(pipeline.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limit_backoff_schedule_is_one_then_two_seconds() {
        let pipeline =
            ScriptedPipeline::new(vec![rate_limited(), rate_limited(), ok("third time lucky")]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(3, sleeper.clone());

        let outcome = policy.invoke(&pipeline, "q").await.unwrap();
        assert_eq!(outcome.answer, "third time lucky");
        assert_eq!(pipeline.calls(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_exhausted_retries_surface_as_unavailable() {
        let pipeline =
            ScriptedPipeline::new(vec![rate_limited(), rate_limited(), rate_limited()]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(3, sleeper.clone());

        let err = policy.invoke(&pipeline, "q").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable));
        assert_eq!(pipeline.calls(), 3);
        assert_eq!(
            sleeper.delays(),
            vec![Duration::from_secs(1), Duration::from_secs(2)]
        );
    }

    #[tokio::test]
    async fn test_single_attempt_never_retries() {
        let pipeline = ScriptedPipeline::new(vec![rate_limited()]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(1, sleeper.clone());

        let err = policy.invoke(&pipeline, "q").await.unwrap_err();
        assert!(matches!(err, Error::UpstreamUnavailable));
        assert_eq!(pipeline.calls(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn test_unstructured_rate_limit_text_is_retried() {
        let pipeline = ScriptedPipeline::new(vec![
            Err(Error::Llm("HTTP 429 - Rate limit exceeded".to_string())),
            ok("recovered"),
        ]);
        let sleeper = RecordingSleeper::new();
        let policy = RetryPolicy::with_sleeper(3, sleeper.clone());

        let outcome = policy.invoke(&pipeline, "q").await.unwrap();
        assert_eq!(outcome.answer, "recovered");
        assert_eq!(sleeper.delays(), vec![Duration::from_secs(1)]);
    }
}
