#[cfg(feature = "circuit-breaker")]
pub mod circuit_breaker {
    use tokio_retry::strategy::{jitter, ExponentialBackoff};
    use tokio_retry::Retry;

    /// Runs `operation` once, then up to `retries` more times with jittered
    /// exponential backoff starting at 100 ms.
    pub async fn with_retry<F, T, E, Fut>(retries: usize, operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
    {
        let strategy = ExponentialBackoff::from_millis(100)
            .map(jitter)
            .take(retries);

        Retry::spawn(strategy, operation).await
    }
}
