//! Ports layer: the interfaces the core consumes.
//!
//! External collaborators (the Task API, the chat platform, dialogue
//! state storage) appear here as traits; adapters implement them.

mod chat_transport;
mod dialogue_store;
mod task_api;

pub use chat_transport::{ByteStream, ChatTransport, FileDownload, TransportError};
pub use dialogue_store::{DialogueStore, DialogueStoreError};
pub use task_api::{
    AttachmentUpload, NewComment, NewTask, RemoteBody, RemoteResult, TaskApi, TaskApiError,
};
