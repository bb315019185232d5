//! Chat transport port - the outbound half of the chat platform.
//!
//! Inbound delivery (polling, update decoding) belongs to the adapter;
//! the core only needs to send replies and open file download streams.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::Path;
use std::pin::Pin;
use thiserror::Error;

use crate::domain::ConversationId;

/// A streaming byte source, yielded chunk by chunk without buffering
/// the whole payload.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Errors from the chat transport. Not recovered by the core; they
/// propagate to the polling loop, which logs and moves on.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport network error: {0}")]
    Network(String),

    #[error("chat API rejected the call: {0}")]
    Api(String),

    #[error("file has no download path")]
    MissingFilePath,

    #[error("IO error: {0}")]
    Io(String),
}

impl TransportError {
    pub fn network(message: impl Into<String>) -> Self {
        TransportError::Network(message.into())
    }

    pub fn api(message: impl Into<String>) -> Self {
        TransportError::Api(message.into())
    }
}

/// An open file download: declared size plus the byte stream.
pub struct FileDownload {
    pub size: u64,
    pub stream: ByteStream,
}

/// Port for sending replies and fetching files from the chat platform.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Sends a plain text reply.
    async fn send_text(&self, chat: ConversationId, text: &str) -> Result<(), TransportError>;

    /// Sends a reply rendered with Markdown (used for pretty JSON).
    async fn send_markdown(&self, chat: ConversationId, text: &str) -> Result<(), TransportError>;

    /// Sends a photo from local disk (the welcome image).
    async fn send_photo(&self, chat: ConversationId, path: &Path) -> Result<(), TransportError>;

    /// Sends text together with a reply keyboard listing commands.
    async fn send_keyboard(
        &self,
        chat: ConversationId,
        text: &str,
        commands: &[&str],
    ) -> Result<(), TransportError>;

    /// Opens a download stream for a previously referenced file.
    async fn download_file(&self, file_ref: &str) -> Result<FileDownload, TransportError>;
}
