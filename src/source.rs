use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

use crate::SourceError;

/// Delivers the body of one response as a sequence of chunks.
///
/// `Ok(None)` is the end-of-body signal.
#[async_trait]
pub trait ChunkSource: Send {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, SourceError>;
}

/// Chunks pushed through a Tokio channel. Closing the sender ends the body.
pub struct ChannelChunkSource {
    rx: mpsc::Receiver<Bytes>,
}

impl ChannelChunkSource {
    pub fn new(rx: mpsc::Receiver<Bytes>) -> Self {
        Self { rx }
    }
}

#[async_trait]
impl ChunkSource for ChannelChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, SourceError> {
        Ok(self.rx.recv().await)
    }
}

/// Chunks held in memory, handed out in order.
pub struct IterChunkSource {
    chunks: std::vec::IntoIter<Bytes>,
}

impl IterChunkSource {
    pub fn new<I, B>(chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        Self {
            chunks: chunks
                .into_iter()
                .map(Into::into)
                .collect::<Vec<_>>()
                .into_iter(),
        }
    }

    /// Splits `data` into chunks of at most `chunk_size` bytes.
    pub fn split(data: &[u8], chunk_size: usize) -> Self {
        Self::new(
            data.chunks(chunk_size.max(1))
                .map(Bytes::copy_from_slice)
                .collect::<Vec<_>>(),
        )
    }
}

#[async_trait]
impl ChunkSource for IterChunkSource {
    async fn next_chunk(&mut self) -> Result<Option<Bytes>, SourceError> {
        Ok(self.chunks.next())
    }
}

#[cfg(feature = "http")]
pub use http::HttpChunkSource;

#[cfg(feature = "http")]
mod http {
    use std::pin::Pin;

    use async_trait::async_trait;
    use bytes::Bytes;
    use futures::{Stream, StreamExt};
    use reqwest::{Client, Url};
    use tracing::{debug, instrument};

    use super::ChunkSource;
    use crate::{FetchConfig, SourceError};

    type BodyStream = Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>;

    /// Streams the body of a `GET` request chunk by chunk.
    pub struct HttpChunkSource {
        body: BodyStream,
    }

    impl HttpChunkSource {
        #[instrument(skip(config), fields(host = %config.host))]
        pub async fn connect(config: &FetchConfig) -> Result<Self, SourceError> {
            let url = Url::parse(&config.url()).map_err(|e| SourceError::Config(e.to_string()))?;
            let client = Client::builder().timeout(config.request_timeout()).build()?;

            let response = client.get(url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Status(status.as_u16()));
            }
            debug!(status = status.as_u16(), length = ?response.content_length(), "response headers received");

            Ok(Self {
                body: Box::pin(response.bytes_stream()),
            })
        }
    }

    #[async_trait]
    impl ChunkSource for HttpChunkSource {
        async fn next_chunk(&mut self) -> Result<Option<Bytes>, SourceError> {
            Ok(self.body.next().await.transpose()?)
        }
    }
}
