//! Reply rendering: turning a submission outcome into the text shown
//! to the user.
//!
//! Success bodies are pretty-printed JSON in a fenced block sent with
//! Markdown, except the two creation endpoints with special shapes
//! (created user -> `user_id: N`, created task -> bare id). Failures
//! show the raw response text exactly as received, with no markup.

use serde_json::Value;

use crate::domain::dialogue::{Draft, FlowKind};
use crate::ports::{RemoteBody, RemoteResult};

/// A reply plus the display mode it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Plain(String),
    Markdown(String),
}

impl Reply {
    pub fn text(&self) -> &str {
        match self {
            Reply::Plain(text) | Reply::Markdown(text) => text,
        }
    }
}

/// Wraps pretty-printed JSON in a fenced code block.
pub fn pretty_json(value: &Value) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
    format!("```json\n{pretty}\n```")
}

/// Renders the outcome of one submission.
pub fn render_submission(flow: FlowKind, draft: &Draft, result: &RemoteResult) -> Reply {
    if !result.success {
        return Reply::Plain(raw_body(&result.body));
    }

    match (flow, &result.body) {
        (FlowKind::CreateUser, RemoteBody::Json(body)) => {
            let id = body.get("id").cloned().unwrap_or(Value::Null);
            Reply::Plain(format!("user_id: {id}"))
        }
        (FlowKind::CreateTask, RemoteBody::Json(body)) => {
            Reply::Plain(format!("created task id: {body}"))
        }
        (FlowKind::AddAttachment, _) => {
            let name = draft
                .file("attachment")
                .map(|h| h.upload_name().to_string())
                .unwrap_or_else(|| "file".to_string());
            Reply::Plain(format!("attached {name}"))
        }
        (_, RemoteBody::Json(body)) => Reply::Markdown(pretty_json(body)),
        (_, RemoteBody::Text(text)) => Reply::Plain(text.clone()),
    }
}

/// Failure body exactly as received, no re-encoding.
fn raw_body(body: &RemoteBody) -> String {
    match body {
        RemoteBody::Text(text) => text.clone(),
        RemoteBody::Json(value) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::attachment::FileHandle;
    use crate::domain::dialogue::FieldValue;
    use serde_json::json;

    #[test]
    fn created_user_renders_bare_id_line() {
        let result = RemoteResult::ok(201, json!({"id": 7}));
        let reply = render_submission(FlowKind::CreateUser, &Draft::new(), &result);
        assert_eq!(reply, Reply::Plain("user_id: 7".into()));
    }

    #[test]
    fn created_task_renders_the_bare_body_id() {
        let result = RemoteResult::ok(200, json!(15));
        let reply = render_submission(FlowKind::CreateTask, &Draft::new(), &result);
        assert_eq!(reply, Reply::Plain("created task id: 15".into()));
    }

    #[test]
    fn lookup_success_is_fenced_pretty_json() {
        let result = RemoteResult::ok(200, json!({"id": 42, "title": "x"}));
        let reply = render_submission(FlowKind::GetTask, &Draft::new(), &result);
        match reply {
            Reply::Markdown(text) => {
                assert!(text.starts_with("```json\n"));
                assert!(text.ends_with("\n```"));
                assert!(text.contains("\"id\": 42"));
            }
            other => panic!("expected markdown, got {other:?}"),
        }
    }

    #[test]
    fn failure_shows_raw_text_unmodified() {
        let result = RemoteResult::failed(404, "not found");
        let reply = render_submission(FlowKind::GetTask, &Draft::new(), &result);
        assert_eq!(reply, Reply::Plain("not found".into()));
    }

    #[test]
    fn attachment_success_names_the_uploaded_file() {
        let mut draft = Draft::new();
        draft.push(
            "attachment",
            FieldValue::File(FileHandle::new("f", 1, Some("report.pdf".into()))),
        );
        let result = RemoteResult::ok(201, json!({}));
        let reply = render_submission(FlowKind::AddAttachment, &draft, &result);
        assert_eq!(reply, Reply::Plain("attached report.pdf".into()));
    }
}
