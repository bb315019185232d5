//! Attachment streaming relay.
//!
//! Pipes a file from the chat platform's download stream into the Task
//! API's upload request in fixed-size chunks. At most one chunk is
//! buffered at any point and the stream is never seeked; completion is
//! reached when the source runs dry, at which point the upload request
//! finalizes and its status decides success.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::attachment::FileHandle;
use crate::ports::{
    AttachmentUpload, ByteStream, ChatTransport, RemoteResult, TaskApi, TaskApiError,
    TransportError,
};

/// Chunk size for the relay: 5 MiB.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Failure on either leg of the relay. Both the download stream and the
/// upload request are dropped on every exit path.
#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Download(#[from] TransportError),

    #[error(transparent)]
    Upload(#[from] TaskApiError),
}

/// Re-slices a byte stream into fixed-size chunks.
///
/// Every emitted chunk is exactly `chunk_size` bytes except the final
/// one, which carries the remainder. A source error ends the stream
/// after being forwarded; buffered bytes before the error are dropped,
/// since a truncated upload cannot be completed anyway.
pub fn rechunk<S, E>(source: S, chunk_size: usize) -> impl Stream<Item = Result<Bytes, E>>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Send + 'static,
{
    assert!(chunk_size > 0, "chunk size must be positive");

    struct State<S> {
        source: Pin<Box<S>>,
        buf: BytesMut,
        done: bool,
    }

    futures::stream::unfold(
        State {
            source: Box::pin(source),
            buf: BytesMut::new(),
            done: false,
        },
        move |mut state| async move {
            loop {
                if state.buf.len() >= chunk_size {
                    let chunk = state.buf.split_to(chunk_size).freeze();
                    return Some((Ok(chunk), state));
                }
                if state.done {
                    if state.buf.is_empty() {
                        return None;
                    }
                    let chunk = state.buf.split().freeze();
                    return Some((Ok(chunk), state));
                }
                match state.source.next().await {
                    Some(Ok(bytes)) => state.buf.extend_from_slice(&bytes),
                    Some(Err(err)) => {
                        state.done = true;
                        state.buf.clear();
                        return Some((Err(err), state));
                    }
                    None => state.done = true,
                }
            }
        },
    )
}

/// Relays one attachment from the chat platform to the Task API.
pub struct AttachmentRelay {
    transport: Arc<dyn ChatTransport>,
    api: Arc<dyn TaskApi>,
}

impl AttachmentRelay {
    pub fn new(transport: Arc<dyn ChatTransport>, api: Arc<dyn TaskApi>) -> Self {
        Self { transport, api }
    }

    /// Opens the download stream, rechunks it and feeds it to the
    /// upload request as one continuous body.
    ///
    /// The upload carries the declared size as Content-Length and the
    /// declared name (or the image fallback) in the Filename header.
    pub async fn relay(
        &self,
        task_id: i64,
        handle: &FileHandle,
    ) -> Result<RemoteResult, RelayError> {
        tracing::info!(task_id, file_ref = %handle.file_ref, "relaying attachment");

        let download = self.transport.download_file(&handle.file_ref).await?;
        let content_length = if handle.declared_size > 0 {
            handle.declared_size
        } else {
            download.size
        };

        let body: ByteStream = Box::pin(rechunk(download.stream, CHUNK_SIZE));
        let upload = AttachmentUpload {
            filename: handle.upload_name().to_string(),
            content_length,
            body,
        };

        let result = self.api.upload_attachment(task_id, upload).await?;
        tracing::info!(task_id, status = result.status, "attachment relay finished");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;

    const MIB: usize = 1024 * 1024;

    async fn collect(
        source: impl Stream<Item = Result<Bytes, TransportError>> + Send + 'static,
        chunk_size: usize,
    ) -> Vec<Bytes> {
        rechunk(source, chunk_size)
            .map(|chunk| chunk.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn twelve_mib_becomes_three_chunks_of_five_five_two() {
        // Source delivers in 1 MiB reads, as a network stream would.
        let reads: Vec<Result<Bytes, TransportError>> = (0..12)
            .map(|_| Ok(Bytes::from(vec![0u8; MIB])))
            .collect();
        let chunks = collect(stream::iter(reads), 5 * MIB).await;
        let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
        assert_eq!(sizes, vec![5 * MIB, 5 * MIB, 2 * MIB]);
    }

    #[tokio::test]
    async fn exact_multiple_has_no_trailing_fragment() {
        let reads: Vec<Result<Bytes, TransportError>> =
            vec![Ok(Bytes::from(vec![1u8; 10 * MIB]))];
        let chunks = collect(stream::iter(reads), 5 * MIB).await;
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 5 * MIB));
    }

    #[tokio::test]
    async fn empty_source_yields_no_chunks() {
        let reads: Vec<Result<Bytes, TransportError>> = vec![];
        let chunks = collect(stream::iter(reads), 5 * MIB).await;
        assert!(chunks.is_empty());
    }

    #[tokio::test]
    async fn bytes_survive_rechunking_in_order() {
        let reads: Vec<Result<Bytes, TransportError>> = vec![
            Ok(Bytes::from_static(b"hello ")),
            Ok(Bytes::from_static(b"chunked ")),
            Ok(Bytes::from_static(b"world")),
        ];
        let chunks = collect(stream::iter(reads), 4).await;
        let joined: Vec<u8> = chunks.iter().flat_map(|c| c.to_vec()).collect();
        assert_eq!(joined, b"hello chunked world");
        assert!(chunks[..chunks.len() - 1].iter().all(|c| c.len() == 4));
    }

    #[tokio::test]
    async fn source_error_is_forwarded_and_ends_the_stream() {
        let reads: Vec<Result<Bytes, TransportError>> = vec![
            Ok(Bytes::from_static(b"partial")),
            Err(TransportError::network("connection reset")),
        ];
        let collected: Vec<_> = rechunk(stream::iter(reads), 4).collect().await;
        // One full chunk fits before the error surfaces.
        assert_eq!(collected.len(), 2);
        assert!(collected[0].is_ok());
        assert!(collected[1].is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rechunking_preserves_bytes_and_bounds_chunk_sizes(
                reads in proptest::collection::vec(
                    proptest::collection::vec(any::<u8>(), 0..64),
                    0..20,
                ),
                chunk_size in 1usize..16,
            ) {
                let expected: Vec<u8> = reads.iter().flatten().copied().collect();
                let source = stream::iter(
                    reads
                        .into_iter()
                        .map(|r| Ok::<_, TransportError>(Bytes::from(r)))
                        .collect::<Vec<_>>(),
                );

                let runtime = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                let chunks = runtime.block_on(collect(source, chunk_size));

                let joined: Vec<u8> = chunks.iter().flat_map(|c| c.to_vec()).collect();
                prop_assert_eq!(joined, expected);
                if let Some((last, full)) = chunks.split_last() {
                    prop_assert!(full.iter().all(|c| c.len() == chunk_size));
                    prop_assert!(!last.is_empty() && last.len() <= chunk_size);
                }
            }
        }
    }
}
