//! The dialogue domain: flows, drafts and the conversation engine.
//!
//! A [`FlowKind`] is a fixed multi-step template; a [`Dialogue`] is one
//! running instance of it for one chat; the [`engine`] advances a
//! dialogue strictly in response to ordered user messages, buffering
//! partial input into a [`Draft`] until the flow's final field arrives.

mod dialogue;
mod draft;
pub mod engine;
mod errors;
mod flow;

pub use dialogue::{Dialogue, StepResult};
pub use draft::{Draft, FieldValue};
pub use engine::{Effect, IncomingMessage};
pub use errors::DialogueError;
pub use flow::{FieldKind, FieldSpec, FlowKind, OMIT_SENTINEL};
