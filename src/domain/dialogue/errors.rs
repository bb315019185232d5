//! Dialogue-specific error types.

use thiserror::Error;

/// Errors raised while applying a message to a dialogue step.
///
/// These are step-boundary errors: the engine converts them into a
/// rejection reply and keeps the current step, so a bad input never
/// leaves a dialogue stuck.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DialogueError {
    /// An integer field received input that does not parse.
    #[error("'{input}' is not a valid integer for {field}")]
    InvalidInteger { field: &'static str, input: String },

    /// A text field received a message with no text (e.g. a bare sticker).
    #[error("expected text for {field}")]
    MissingText { field: &'static str },

    /// The attachment step received a message carrying none of the
    /// recognized attachment kinds.
    #[error("no document, animation, audio, video or photo in the message")]
    NoAttachment,
}

impl DialogueError {
    pub fn invalid_integer(field: &'static str, input: impl Into<String>) -> Self {
        DialogueError::InvalidInteger {
            field,
            input: input.into(),
        }
    }

    pub fn missing_text(field: &'static str) -> Self {
        DialogueError::MissingText { field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_integer_names_field_and_input() {
        let err = DialogueError::invalid_integer("task_id", "forty-two");
        assert_eq!(
            err.to_string(),
            "'forty-two' is not a valid integer for task_id"
        );
    }

    #[test]
    fn no_attachment_lists_recognized_kinds() {
        assert!(DialogueError::NoAttachment.to_string().contains("photo"));
    }
}
