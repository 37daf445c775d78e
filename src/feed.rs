use futures::Stream;
use tracing::{debug, instrument, warn};

use crate::{
    metrics, ChunkSource, ExtractError, PollError, PriceRecord, PriceSeries, ReassemblerConfig,
    RecordExtractor, StreamReassembler,
};

/// Item of [`PriceFeed::records`].
#[derive(Debug)]
pub enum FeedEvent {
    Record(PriceRecord),
    /// An element that was delimited correctly but could not be decoded.
    Skipped(ExtractError),
}

impl FeedEvent {
    pub fn record(&self) -> Option<&PriceRecord> {
        match self {
            FeedEvent::Record(record) => Some(record),
            FeedEvent::Skipped(_) => None,
        }
    }
}

/// Drives one response body through a fresh reassembler and the extractor.
#[derive(Debug, Clone, Default)]
pub struct PriceFeed {
    reassembler: ReassemblerConfig,
    extractor: RecordExtractor,
}

impl PriceFeed {
    pub fn new(reassembler: ReassemblerConfig, extractor: RecordExtractor) -> Self {
        Self {
            reassembler,
            extractor,
        }
    }

    /// Reads `source` to the end of the array and returns every price in it.
    ///
    /// Undecodable elements are skipped and counted in
    /// [`PriceSeries::skipped`]. Transport and reassembly errors abort.
    #[instrument(skip(self, source))]
    pub async fn collect<S: ChunkSource>(&self, source: &mut S) -> Result<PriceSeries, PollError> {
        let mut reassembler = StreamReassembler::with_config(self.reassembler.clone());
        let mut series = PriceSeries::default();

        while let Some(chunk) = source.next_chunk().await? {
            for fragment in reassembler.feed(&chunk)? {
                self.extractor.decode_into(fragment, &mut series);
            }
            if reassembler.is_completed() {
                break;
            }
        }
        reassembler.finish()?;

        debug!(records = series.len(), skipped = series.skipped, "response collected");
        Ok(series)
    }

    /// Same as [`PriceFeed::collect`], but yields each record as soon as its
    /// element is complete. Undecodable elements come through as
    /// [`FeedEvent::Skipped`] so the caller can count them.
    pub fn records<'a, S>(
        &'a self,
        mut source: S,
    ) -> impl Stream<Item = Result<FeedEvent, PollError>> + 'a
    where
        S: ChunkSource + 'a,
    {
        async_stream::try_stream! {
            let mut reassembler = StreamReassembler::with_config(self.reassembler.clone());

            while let Some(chunk) = source.next_chunk().await? {
                for fragment in reassembler.feed(&chunk)? {
                    match self.extractor.decode(fragment) {
                        Ok(records) => {
                            for record in records {
                                yield FeedEvent::Record(record);
                            }
                        }
                        Err(e) => {
                            warn!("Skipping undecodable element: {}", e);
                            metrics::record_skipped();
                            yield FeedEvent::Skipped(e);
                        }
                    }
                }
                if reassembler.is_completed() {
                    break;
                }
            }
            reassembler.finish()?;
        }
    }
}
