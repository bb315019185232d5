//! Domain layer: pure conversation model, no I/O.

pub mod attachment;
pub mod dialogue;
pub mod ids;

pub use ids::ConversationId;
