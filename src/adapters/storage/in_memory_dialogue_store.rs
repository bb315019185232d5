//! In-Memory Dialogue Store Adapter
//!
//! Keeps the conversation -> dialogue mapping in process memory. This
//! is the only session store the bot needs: dialogue state is volatile
//! and does not survive restarts.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::dialogue::Dialogue;
use crate::domain::ConversationId;
use crate::ports::{DialogueStore, DialogueStoreError};

/// In-memory mapping of conversations to their active dialogue.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDialogueStore {
    dialogues: Arc<RwLock<HashMap<ConversationId, Dialogue>>>,
}

impl InMemoryDialogueStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with an active dialogue.
    pub async fn active_count(&self) -> usize {
        self.dialogues.read().await.len()
    }
}

#[async_trait]
impl DialogueStore for InMemoryDialogueStore {
    async fn get(
        &self,
        conversation: ConversationId,
    ) -> Result<Option<Dialogue>, DialogueStoreError> {
        let dialogues = self.dialogues.read().await;
        Ok(dialogues.get(&conversation).cloned())
    }

    async fn put(
        &self,
        conversation: ConversationId,
        dialogue: Dialogue,
    ) -> Result<(), DialogueStoreError> {
        let mut dialogues = self.dialogues.write().await;
        dialogues.insert(conversation, dialogue);
        Ok(())
    }

    async fn clear(&self, conversation: ConversationId) -> Result<(), DialogueStoreError> {
        let mut dialogues = self.dialogues.write().await;
        dialogues.remove(&conversation);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dialogue::FlowKind;

    fn chat(id: i64) -> ConversationId {
        ConversationId::new(id)
    }

    #[tokio::test]
    async fn get_returns_none_for_idle_conversation() {
        let store = InMemoryDialogueStore::new();
        assert!(store.get(chat(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let store = InMemoryDialogueStore::new();
        store.put(chat(1), Dialogue::new(FlowKind::GetTask)).await.unwrap();
        let dialogue = store.get(chat(1)).await.unwrap().unwrap();
        assert_eq!(dialogue.flow(), FlowKind::GetTask);
    }

    #[tokio::test]
    async fn put_replaces_the_previous_dialogue() {
        let store = InMemoryDialogueStore::new();
        store.put(chat(1), Dialogue::new(FlowKind::CreateTask)).await.unwrap();
        store.put(chat(1), Dialogue::new(FlowKind::GetUser)).await.unwrap();
        let dialogue = store.get(chat(1)).await.unwrap().unwrap();
        assert_eq!(dialogue.flow(), FlowKind::GetUser);
        assert_eq!(store.active_count().await, 1);
    }

    #[tokio::test]
    async fn clear_twice_is_a_no_op_the_second_time() {
        let store = InMemoryDialogueStore::new();
        store.put(chat(1), Dialogue::new(FlowKind::GetTask)).await.unwrap();
        store.clear(chat(1)).await.unwrap();
        assert!(store.get(chat(1)).await.unwrap().is_none());
        store.clear(chat(1)).await.unwrap();
        assert!(store.get(chat(1)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn conversations_are_independent() {
        let store = InMemoryDialogueStore::new();
        store.put(chat(1), Dialogue::new(FlowKind::GetTask)).await.unwrap();
        store.put(chat(2), Dialogue::new(FlowKind::CreateUser)).await.unwrap();
        store.clear(chat(1)).await.unwrap();
        assert!(store.get(chat(1)).await.unwrap().is_none());
        assert!(store.get(chat(2)).await.unwrap().is_some());
    }
}
