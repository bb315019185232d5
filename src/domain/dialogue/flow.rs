//! Flow definitions: the fixed, ordered field sequences of every
//! multi-step conversation the bot supports.
//!
//! A flow is a template; a [`Dialogue`](super::Dialogue) is one running
//! instance of it. Field order is significant and never changes at
//! runtime, so the tables live here as `'static` data.

use serde::{Deserialize, Serialize};

use super::draft::FieldValue;
use super::errors::DialogueError;

/// The single-character input that skips an optional field.
pub const OMIT_SENTINEL: &str = "-";

/// The conversation flows the bot can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    CreateUser,
    GetUser,
    CreateTask,
    GetTask,
    CreateComment,
    GetComment,
    AddAttachment,
}

/// How one field's raw input is parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, stored verbatim; `trim` strips surrounding whitespace.
    Text { trim: bool },
    /// Integer; anything unparseable is rejected at the step boundary.
    Int,
    /// Trimmed text, or the `-` sentinel for "intentionally omitted".
    OptionalText,
    /// `", "`-separated id tokens; `-` or empty yields an empty list.
    TaskIdList,
    /// A file attached to the message rather than typed text.
    File,
}

/// One position in a flow's field sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name as submitted to the Task API.
    pub name: &'static str,
    /// Prompt sent to the user when this step is reached.
    pub prompt: &'static str,
    pub kind: FieldKind,
}

const CREATE_USER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "name",
    prompt: "Please enter user_name",
    kind: FieldKind::Text { trim: false },
}];

const GET_USER_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "user_id",
    prompt: "Please enter user_id",
    kind: FieldKind::Int,
}];

const CREATE_TASK_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "title",
        prompt: "Enter task title",
        kind: FieldKind::Text { trim: true },
    },
    FieldSpec {
        name: "description",
        prompt: "Enter task description",
        kind: FieldKind::OptionalText,
    },
    FieldSpec {
        name: "reporter_id",
        prompt: "Enter reporter id",
        kind: FieldKind::Int,
    },
    FieldSpec {
        name: "assignee_id",
        prompt: "Enter assignee id",
        kind: FieldKind::OptionalText,
    },
    FieldSpec {
        name: "related_task_ids",
        prompt: "Enter related task ids",
        kind: FieldKind::TaskIdList,
    },
];

const GET_TASK_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "task_id",
    prompt: "Enter task id",
    kind: FieldKind::Int,
}];

const CREATE_COMMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "text",
        prompt: "Enter comment text",
        kind: FieldKind::Text { trim: false },
    },
    FieldSpec {
        name: "user_id",
        prompt: "Enter user id",
        kind: FieldKind::Int,
    },
    FieldSpec {
        name: "task_id",
        prompt: "Enter task id",
        kind: FieldKind::Int,
    },
];

const GET_COMMENT_FIELDS: &[FieldSpec] = &[FieldSpec {
    name: "comment_id",
    prompt: "Enter comment id",
    kind: FieldKind::Int,
}];

const ADD_ATTACHMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "task_id",
        prompt: "Enter task id",
        kind: FieldKind::Int,
    },
    FieldSpec {
        name: "attachment",
        prompt: "Send the file to attach",
        kind: FieldKind::File,
    },
];

impl FlowKind {
    /// Returns the flow's ordered field sequence.
    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            FlowKind::CreateUser => CREATE_USER_FIELDS,
            FlowKind::GetUser => GET_USER_FIELDS,
            FlowKind::CreateTask => CREATE_TASK_FIELDS,
            FlowKind::GetTask => GET_TASK_FIELDS,
            FlowKind::CreateComment => CREATE_COMMENT_FIELDS,
            FlowKind::GetComment => GET_COMMENT_FIELDS,
            FlowKind::AddAttachment => ADD_ATTACHMENT_FIELDS,
        }
    }

    /// Prompt for the first step of this flow.
    pub fn first_prompt(&self) -> &'static str {
        self.fields()[0].prompt
    }
}

impl FieldKind {
    /// Parses one text input according to this field kind.
    ///
    /// `File` fields never parse text; attachment selection happens in
    /// the engine before this is reached.
    pub fn parse(&self, spec: &FieldSpec, text: &str) -> Result<FieldValue, DialogueError> {
        match self {
            FieldKind::Text { trim: true } => Ok(FieldValue::Text(text.trim().to_string())),
            FieldKind::Text { trim: false } => Ok(FieldValue::Text(text.to_string())),
            FieldKind::Int => text
                .trim()
                .parse::<i64>()
                .map(FieldValue::Int)
                .map_err(|_| DialogueError::invalid_integer(spec.name, text)),
            FieldKind::OptionalText => {
                let trimmed = text.trim();
                if trimmed == OMIT_SENTINEL {
                    Ok(FieldValue::Absent)
                } else {
                    Ok(FieldValue::Text(trimmed.to_string()))
                }
            }
            FieldKind::TaskIdList => Ok(FieldValue::List(parse_task_id_list(text))),
            FieldKind::File => Err(DialogueError::missing_text(spec.name)),
        }
    }
}

/// Splits a `", "`-separated id list; the sentinel or an empty input
/// yields an empty list rather than an error.
fn parse_task_id_list(text: &str) -> Vec<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed == OMIT_SENTINEL {
        return Vec::new();
    }
    trimmed.split(", ").map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod field_tables {
        use super::*;

        #[test]
        fn create_task_has_five_ordered_fields() {
            let names: Vec<_> = FlowKind::CreateTask
                .fields()
                .iter()
                .map(|f| f.name)
                .collect();
            assert_eq!(
                names,
                vec![
                    "title",
                    "description",
                    "reporter_id",
                    "assignee_id",
                    "related_task_ids"
                ]
            );
        }

        #[test]
        fn lookups_are_single_integer_steps() {
            for flow in [FlowKind::GetUser, FlowKind::GetTask, FlowKind::GetComment] {
                let fields = flow.fields();
                assert_eq!(fields.len(), 1);
                assert_eq!(fields[0].kind, FieldKind::Int);
            }
        }

        #[test]
        fn add_attachment_ends_with_a_file_step() {
            let fields = FlowKind::AddAttachment.fields();
            assert_eq!(fields.last().unwrap().kind, FieldKind::File);
        }

        #[test]
        fn first_prompt_matches_first_field() {
            assert_eq!(FlowKind::CreateUser.first_prompt(), "Please enter user_name");
            assert_eq!(FlowKind::CreateTask.first_prompt(), "Enter task title");
        }
    }

    mod parsing {
        use super::*;

        fn spec(kind: FieldKind) -> FieldSpec {
            FieldSpec {
                name: "field",
                prompt: "prompt",
                kind,
            }
        }

        #[test]
        fn trimming_text_strips_whitespace() {
            let s = spec(FieldKind::Text { trim: true });
            assert_eq!(
                s.kind.parse(&s, "  hello  ").unwrap(),
                FieldValue::Text("hello".to_string())
            );
        }

        #[test]
        fn verbatim_text_is_kept_as_is() {
            let s = spec(FieldKind::Text { trim: false });
            assert_eq!(
                s.kind.parse(&s, " spaced ").unwrap(),
                FieldValue::Text(" spaced ".to_string())
            );
        }

        #[test]
        fn integer_parses_with_surrounding_whitespace() {
            let s = spec(FieldKind::Int);
            assert_eq!(s.kind.parse(&s, " 42 ").unwrap(), FieldValue::Int(42));
        }

        #[test]
        fn bad_integer_is_rejected_with_field_name() {
            let s = spec(FieldKind::Int);
            let err = s.kind.parse(&s, "forty-two").unwrap_err();
            assert_eq!(err, DialogueError::invalid_integer("field", "forty-two"));
        }

        #[test]
        fn sentinel_maps_optional_text_to_absent() {
            let s = spec(FieldKind::OptionalText);
            assert_eq!(s.kind.parse(&s, "-").unwrap(), FieldValue::Absent);
        }

        #[test]
        fn non_sentinel_optional_text_is_trimmed_and_kept() {
            let s = spec(FieldKind::OptionalText);
            assert_eq!(
                s.kind.parse(&s, " urgent ").unwrap(),
                FieldValue::Text("urgent".to_string())
            );
        }

        #[test]
        fn task_id_list_splits_on_comma_space() {
            let s = spec(FieldKind::TaskIdList);
            assert_eq!(
                s.kind.parse(&s, "1, 2, 3").unwrap(),
                FieldValue::List(vec!["1".into(), "2".into(), "3".into()])
            );
        }

        #[test]
        fn task_id_list_sentinel_and_empty_yield_empty_list() {
            let s = spec(FieldKind::TaskIdList);
            assert_eq!(s.kind.parse(&s, "-").unwrap(), FieldValue::List(vec![]));
            assert_eq!(s.kind.parse(&s, "").unwrap(), FieldValue::List(vec![]));
        }

        #[test]
        fn file_step_rejects_text_input() {
            let s = spec(FieldKind::File);
            assert!(s.kind.parse(&s, "anything").is_err());
        }
    }
}
