//! Task API port - the remote task-tracking service.
//!
//! One method per flow. A non-success status code from the service is
//! NOT an error here: it comes back as a [`RemoteResult`] with
//! `success == false` and the raw body for display. [`TaskApiError`]
//! covers only transport-level failures (connection refused, bad
//! response encoding), which the caller reports and moves on from.
//! Nothing is ever retried.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::chat_transport::ByteStream;

/// Transport-level failure talking to the Task API.
#[derive(Debug, Error)]
pub enum TaskApiError {
    #[error("task API network error: {0}")]
    Network(String),

    #[error("failed to read task API response: {0}")]
    Decode(String),
}

impl TaskApiError {
    pub fn network(message: impl Into<String>) -> Self {
        TaskApiError::Network(message.into())
    }

    pub fn decode(message: impl Into<String>) -> Self {
        TaskApiError::Decode(message.into())
    }
}

/// Response body as kept for display: decoded JSON on success, the raw
/// text unmodified on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteBody {
    Json(Value),
    Text(String),
}

/// Outcome of exactly one submission to the Task API.
///
/// `success` is decided per endpoint by status code (201 for user,
/// comment and attachment creation; 200 everywhere else), never by a
/// thrown error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteResult {
    pub success: bool,
    pub status: u16,
    pub body: RemoteBody,
}

impl RemoteResult {
    pub fn ok(status: u16, body: Value) -> Self {
        Self {
            success: true,
            status,
            body: RemoteBody::Json(body),
        }
    }

    pub fn failed(status: u16, text: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            body: RemoteBody::Text(text.into()),
        }
    }
}

/// JSON body for task creation. Skipped optionals serialize as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub reporter_id: i64,
    pub assignee_id: Option<String>,
    pub related_task_ids: Vec<String>,
}

/// JSON body for comment creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    pub text: String,
    pub user_id: i64,
    pub task_id: i64,
}

/// One streaming attachment upload: out-of-band metadata plus the
/// chunked body. Owned by a single upload call.
pub struct AttachmentUpload {
    pub filename: String,
    pub content_length: u64,
    pub body: ByteStream,
}

/// Port for the remote task-tracking HTTP API.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// POST `users/` with form-encoded `name`; 201 on success.
    async fn create_user(&self, name: &str) -> Result<RemoteResult, TaskApiError>;

    /// GET `users/{id}`; 200 on success.
    async fn get_user(&self, user_id: i64) -> Result<RemoteResult, TaskApiError>;

    /// POST `tasks/` with a JSON body; this endpoint answers 200 with a
    /// bare created id rather than 201 with a resource representation.
    async fn create_task(&self, task: &NewTask) -> Result<RemoteResult, TaskApiError>;

    /// GET `tasks/{id}`; 200 on success.
    async fn get_task(&self, task_id: i64) -> Result<RemoteResult, TaskApiError>;

    /// POST `comments/` with a JSON body; 201 on success.
    async fn create_comment(&self, comment: &NewComment) -> Result<RemoteResult, TaskApiError>;

    /// GET `comments/{id}`; 200 on success.
    async fn get_comment(&self, comment_id: i64) -> Result<RemoteResult, TaskApiError>;

    /// POST `tasks/{id}/attachments/` streaming the upload body with
    /// `Filename` and `Content-Length` headers; 201 on success.
    async fn upload_attachment(
        &self,
        task_id: i64,
        upload: AttachmentUpload,
    ) -> Result<RemoteResult, TaskApiError>;
}
