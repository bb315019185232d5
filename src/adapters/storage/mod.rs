//! Storage adapters.

mod in_memory_dialogue_store;

pub use in_memory_dialogue_store::InMemoryDialogueStore;
