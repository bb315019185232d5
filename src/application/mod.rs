//! Application layer: routing, submission and the attachment relay.

pub mod relay;
pub mod render;
pub mod router;

pub use relay::{AttachmentRelay, RelayError, CHUNK_SIZE};
pub use render::{pretty_json, render_submission, Reply};
pub use router::{Command, Router, RouterError};
