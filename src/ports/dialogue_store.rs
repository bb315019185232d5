//! Dialogue store port - the per-conversation state mapping.
//!
//! The transport serializes delivery per conversation, so at most one
//! mutation is in flight per [`ConversationId`] at a time; across
//! conversations the store must allow concurrent insert, update and
//! remove.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dialogue::Dialogue;
use crate::domain::ConversationId;

/// Errors from the dialogue store backend.
#[derive(Debug, Error)]
pub enum DialogueStoreError {
    #[error("dialogue store backend error: {0}")]
    Backend(String),
}

/// Port mapping each conversation to its active dialogue, if any.
#[async_trait]
pub trait DialogueStore: Send + Sync {
    /// Returns the active dialogue for the conversation.
    async fn get(&self, conversation: ConversationId)
        -> Result<Option<Dialogue>, DialogueStoreError>;

    /// Replaces the conversation's dialogue, discarding any previous one.
    async fn put(
        &self,
        conversation: ConversationId,
        dialogue: Dialogue,
    ) -> Result<(), DialogueStoreError>;

    /// Returns the conversation to idle. Clearing an idle conversation
    /// is a no-op.
    async fn clear(&self, conversation: ConversationId) -> Result<(), DialogueStoreError>;
}
