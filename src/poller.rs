use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, instrument, warn};

use crate::{FetchConfig, HttpChunkSource, PollError, PriceFeed, PriceSeries, SourceError};

/// Fetches the configured URL on a fixed interval.
///
/// A failed cycle is logged and the next tick tries again; the loop only
/// ends when the shutdown signal flips to `true` or its sender is dropped.
pub struct Poller {
    config: FetchConfig,
    feed: PriceFeed,
}

impl Poller {
    pub fn new(config: FetchConfig) -> Self {
        let feed = PriceFeed::new(config.reassembler(), config.extractor());
        Self { config, feed }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    #[instrument(skip(self), fields(url = %self.config.url()))]
    pub async fn poll_once(&self) -> Result<PriceSeries, PollError> {
        let mut source = self.connect().await?;
        let series = self.feed.collect(&mut source).await?;
        info!(records = series.len(), skipped = series.skipped, "prices fetched");
        Ok(series)
    }

    pub async fn run<F>(&self, mut shutdown: watch::Receiver<bool>, mut on_series: F)
    where
        F: FnMut(&PriceSeries),
    {
        let mut ticker = interval(self.config.poll_interval());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop_requested(&mut shutdown) => break,
            }
            // Shutdown is honoured while a fetch is in flight.
            tokio::select! {
                result = self.poll_once() => match result {
                    Ok(series) => on_series(&series),
                    Err(e) => warn!("Price fetch failed, retrying next interval: {}", e),
                },
                _ = stop_requested(&mut shutdown) => break,
            }
        }
        info!("poller stopped");
    }

    #[cfg(feature = "circuit-breaker")]
    async fn connect(&self) -> Result<HttpChunkSource, SourceError> {
        crate::utils::circuit_breaker::with_retry(self.config.retries, || {
            HttpChunkSource::connect(&self.config)
        })
        .await
    }

    #[cfg(not(feature = "circuit-breaker"))]
    async fn connect(&self) -> Result<HttpChunkSource, SourceError> {
        HttpChunkSource::connect(&self.config).await
    }
}

/// Resolves once the signal reads `true` or its sender is gone.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    while !*shutdown.borrow_and_update() {
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}
