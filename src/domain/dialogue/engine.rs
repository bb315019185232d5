//! The dialogue engine: applies one inbound message to a conversation's
//! state and decides what happens next.
//!
//! The engine is a pure function over (active dialogue, message); the
//! caller persists the returned state and executes the returned effect.
//! This keeps every transition unit-testable without I/O.

use crate::domain::attachment::Attachment;

use super::dialogue::{Dialogue, StepResult};
use super::draft::{Draft, FieldValue};
use super::errors::DialogueError;
use super::flow::{FieldKind, FlowKind};

/// One inbound chat message, already stripped of transport detail.
#[derive(Debug, Clone, Default)]
pub struct IncomingMessage {
    pub text: Option<String>,
    pub attachment: Option<Attachment>,
}

impl IncomingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            attachment: None,
        }
    }

    pub fn attachment(attachment: Attachment) -> Self {
        Self {
            text: None,
            attachment: Some(attachment),
        }
    }
}

/// What the caller must do after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the user for the next field.
    Prompt(&'static str),
    /// The flow completed; submit the draft exactly once.
    Submit { flow: FlowKind, draft: Draft },
    /// The input was invalid for the current step; the step is retained.
    Reject {
        reason: String,
        reprompt: &'static str,
    },
    /// No dialogue active and nothing recognized; do nothing.
    Ignored,
}

/// Applies one message and returns the next dialogue state plus the
/// effect to execute.
///
/// A flow hint (a parsed flow-initiating command) always wins: any
/// active dialogue is discarded silently and the new flow starts at its
/// first step. Invalid input for the current step rejects without
/// losing the step, so a typo never strands the conversation.
pub fn on_message(
    active: Option<Dialogue>,
    flow_hint: Option<FlowKind>,
    message: &IncomingMessage,
) -> (Option<Dialogue>, Effect) {
    if let Some(flow) = flow_hint {
        let dialogue = Dialogue::new(flow);
        let prompt = flow.first_prompt();
        return (Some(dialogue), Effect::Prompt(prompt));
    }

    let Some(dialogue) = active else {
        return (None, Effect::Ignored);
    };

    let field = dialogue.current_field();
    let parsed = match field.kind {
        FieldKind::File => match &message.attachment {
            Some(attachment) => attachment.select().map(FieldValue::File),
            None => Err(DialogueError::NoAttachment),
        },
        _ => match &message.text {
            Some(text) => field.kind.parse(field, text),
            None => Err(DialogueError::missing_text(field.name)),
        },
    };

    match parsed {
        Ok(value) => match dialogue.record(value) {
            StepResult::Advanced { dialogue, prompt } => {
                (Some(dialogue), Effect::Prompt(prompt))
            }
            StepResult::Completed { flow, draft } => (None, Effect::Submit { flow, draft }),
        },
        Err(err) => {
            let reprompt = field.prompt;
            (
                Some(dialogue),
                Effect::Reject {
                    reason: err.to_string(),
                    reprompt,
                },
            )
        }
    }
}
