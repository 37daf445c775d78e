//! # Streaming JSON Array Reassembly
//!
//! This library turns an HTTP body of the form `[{...},{...},...]`, delivered
//! as chunks of arbitrary size, into one self-contained `[{...}]` fragment per
//! element. Only the unterminated tail of the element that straddles a chunk
//! edge is kept between chunks; the body as a whole is never buffered.
//!
//! On top of the reassembler sit a price extractor backed by `simd-json`,
//! async chunk sources (HTTP, channel, in-memory) and a periodic poller.
//!
//! ## Example
//!
//! ```
//! use price_dataflow::{RecordExtractor, StreamReassembler, StreamState};
//!
//! let mut reassembler = StreamReassembler::new();
//! let extractor = RecordExtractor::default();
//! let mut prices = Vec::new();
//!
//! let chunks: [&[u8]; 3] = [b"[{\"hinta\":\"1.", b"5\"},{\"hin", b"ta\":\"2.0\"}]"];
//! for chunk in chunks {
//!     for fragment in reassembler.feed(chunk).unwrap() {
//!         for record in extractor.decode(fragment).unwrap() {
//!             prices.push(record.price);
//!         }
//!     }
//! }
//!
//! assert_eq!(reassembler.finish().unwrap(), StreamState::Completed);
//! assert_eq!(prices, vec![1.5, 2.0]);
//! ```

#[cfg(test)]
mod tests;

mod error;
pub use error::*;

mod scanner;
pub use scanner::*;

mod carry;
pub use carry::*;

mod assembler;
pub use assembler::*;

mod reassembler;
pub use reassembler::*;

mod extractor;
pub use extractor::*;

mod source;
pub use source::*;

mod feed;
pub use feed::*;

mod settings;
pub use settings::*;

#[cfg(feature = "http")]
mod poller;
#[cfg(feature = "http")]
pub use poller::*;

pub mod metrics;
pub mod utils;
