use tracing::{debug, instrument, warn};

use crate::{
    metrics, CarryBuffer, ChunkScanner, Fragment, FragmentAssembler, OpenElement, ReassemblyError,
    StreamState,
};

#[derive(Debug, Clone)]
pub struct ReassemblerConfig {
    /// Upper bound on a single element, and therefore on the carry buffer.
    pub max_element_size: usize,
}

impl Default for ReassemblerConfig {
    fn default() -> Self {
        Self {
            max_element_size: 64 * 1024,
        }
    }
}

/// Turns the chunks of one `[{...},{...}]` response body into fragments.
///
/// One instance serves exactly one response. Dropping it at any point
/// releases the carried bytes.
#[derive(Debug)]
pub struct StreamReassembler {
    scanner: ChunkScanner,
    carry: CarryBuffer,
    state: StreamState,
    config: ReassemblerConfig,
    emitted: usize,
}

impl Default for StreamReassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamReassembler {
    pub fn new() -> Self {
        Self::with_config(ReassemblerConfig::default())
    }

    pub fn with_config(config: ReassemblerConfig) -> Self {
        Self {
            scanner: ChunkScanner::new(),
            carry: CarryBuffer::new(),
            state: StreamState::Idle,
            config,
            emitted: 0,
        }
    }

    pub fn state(&self) -> &StreamState {
        &self.state
    }

    pub fn is_completed(&self) -> bool {
        self.state == StreamState::Completed
    }

    pub fn carry_len(&self) -> usize {
        self.carry.len()
    }

    /// Number of fragments handed out so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Consumes one chunk and returns the fragments it completed.
    ///
    /// The chunk is not retained. Any error other than
    /// [`ReassemblyError::StreamClosed`] fails the stream, and fragments
    /// already built from the offending chunk are discarded.
    #[instrument(skip(self, chunk), fields(len = chunk.len()))]
    pub fn feed(&mut self, chunk: &[u8]) -> Result<Vec<Fragment>, ReassemblyError> {
        if self.state.is_terminal() {
            return Err(ReassemblyError::StreamClosed(Box::new(self.state.clone())));
        }
        self.state = StreamState::Streaming;

        match self.step(chunk) {
            Ok(fragments) => {
                self.emitted += fragments.len();
                metrics::fragments_emitted(fragments.len());
                metrics::carry_bytes(self.carry.len());
                debug!(
                    fragments = fragments.len(),
                    carry = self.carry.len(),
                    "chunk reassembled"
                );
                Ok(fragments)
            }
            Err(e) => {
                self.fail(e.clone());
                Err(e)
            }
        }
    }

    fn step(&mut self, chunk: &[u8]) -> Result<Vec<Fragment>, ReassemblyError> {
        let scan = self.scanner.scan(chunk)?;

        let carried = match scan.open {
            Some(OpenElement::StartedAt(start)) => chunk.len() - start,
            Some(OpenElement::Continued) => self.carry.len().saturating_add(chunk.len()),
            None => 0,
        };
        if carried > self.config.max_element_size {
            return Err(ReassemblyError::ElementTooLarge {
                limit: self.config.max_element_size,
            });
        }

        let fragments = FragmentAssembler::assemble(chunk, &scan, &mut self.carry)?;

        if scan.is_terminated() {
            if scan.trailing > 0 {
                debug!(trailing = scan.trailing, "ignoring bytes after array terminator");
            }
            self.state = StreamState::Completed;
        }
        Ok(fragments)
    }

    /// Signals end-of-body from the transport.
    ///
    /// Succeeds only if the top-level array was closed. Otherwise the stream
    /// fails with [`ReassemblyError::TruncatedStream`].
    pub fn finish(&mut self) -> Result<StreamState, ReassemblyError> {
        match &self.state {
            StreamState::Completed => Ok(StreamState::Completed),
            StreamState::Failed(reason) => Err(reason.clone()),
            StreamState::Idle | StreamState::Streaming => {
                let e = ReassemblyError::TruncatedStream {
                    carried: self.carry.len(),
                };
                self.fail(e.clone());
                Err(e)
            }
        }
    }

    fn fail(&mut self, reason: ReassemblyError) {
        warn!(error = %reason, offset = self.scanner.position(), "stream failed");
        self.carry.clear();
        metrics::carry_bytes(0);
        metrics::stream_failed();
        self.state = StreamState::Failed(reason);
    }
}
