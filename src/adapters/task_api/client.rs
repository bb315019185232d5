//! HTTP Task API client - reqwest implementation of the [`TaskApi`] port.
//!
//! Builds exactly one request per completed flow. Success is decided by
//! comparing the response status against the endpoint's expected code
//! (the remote service answers 201 for user/comment/attachment creation
//! but 200 for task creation); every other status is a failure carrying
//! the raw response text for display. Nothing is retried here.

use async_trait::async_trait;
use reqwest::header::CONTENT_LENGTH;
use reqwest::{Body, Client, Response, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::ports::{
    AttachmentUpload, NewComment, NewTask, RemoteResult, TaskApi, TaskApiError,
};

/// Header carrying the original filename on attachment uploads.
const FILENAME_HEADER: &str = "Filename";

/// Configuration for the Task API client.
#[derive(Debug, Clone)]
pub struct HttpTaskApiConfig {
    /// Base URL including the version segment, e.g. `http://host/v1`.
    pub base_url: String,
    /// Timeout applied to the attachment upload leg.
    pub upload_timeout: Duration,
}

impl HttpTaskApiConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            upload_timeout: Duration::from_secs(300),
        }
    }

    /// Sets the upload timeout.
    pub fn with_upload_timeout(mut self, timeout: Duration) -> Self {
        self.upload_timeout = timeout;
        self
    }
}

/// reqwest-backed Task API client.
pub struct HttpTaskApi {
    config: HttpTaskApiConfig,
    client: Client,
}

impl HttpTaskApi {
    /// Creates a new client with the given configuration.
    pub fn new(config: HttpTaskApiConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    /// Joins an endpoint path onto the configured base URL.
    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.config.base_url, endpoint)
    }

    /// Maps a response to a [`RemoteResult`] against the endpoint's
    /// expected success status.
    async fn into_result(
        response: Response,
        expected: StatusCode,
    ) -> Result<RemoteResult, TaskApiError> {
        let status = response.status();
        if status == expected {
            let body: Value = response
                .json()
                .await
                .map_err(|e| TaskApiError::decode(e.to_string()))?;
            Ok(RemoteResult::ok(status.as_u16(), body))
        } else {
            let text = response
                .text()
                .await
                .map_err(|e| TaskApiError::decode(e.to_string()))?;
            Ok(RemoteResult::failed(status.as_u16(), text))
        }
    }

    fn network_error(e: reqwest::Error) -> TaskApiError {
        TaskApiError::network(e.to_string())
    }
}

#[async_trait]
impl TaskApi for HttpTaskApi {
    async fn create_user(&self, name: &str) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .post(self.url("tasks/users/"))
            .form(&[("name", name)])
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::CREATED).await
    }

    async fn get_user(&self, user_id: i64) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .get(self.url(&format!("tasks/users/{user_id}")))
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::OK).await
    }

    async fn create_task(&self, task: &NewTask) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .post(self.url("tasks/tasks/"))
            .json(task)
            .send()
            .await
            .map_err(Self::network_error)?;
        // This endpoint answers 200 with a bare created id, not 201.
        Self::into_result(response, StatusCode::OK).await
    }

    async fn get_task(&self, task_id: i64) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .get(self.url(&format!("tasks/tasks/{task_id}")))
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::OK).await
    }

    async fn create_comment(&self, comment: &NewComment) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .post(self.url("tasks/comments/"))
            .json(comment)
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::CREATED).await
    }

    async fn get_comment(&self, comment_id: i64) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .get(self.url(&format!("tasks/comments/{comment_id}")))
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::OK).await
    }

    async fn upload_attachment(
        &self,
        task_id: i64,
        upload: AttachmentUpload,
    ) -> Result<RemoteResult, TaskApiError> {
        let response = self
            .client
            .post(self.url(&format!("tasks/tasks/{task_id}/attachments/")))
            .header(FILENAME_HEADER, upload.filename)
            .header(CONTENT_LENGTH, upload.content_length)
            .timeout(self.config.upload_timeout)
            .body(Body::wrap_stream(upload.body))
            .send()
            .await
            .map_err(Self::network_error)?;
        Self::into_result(response, StatusCode::CREATED).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> HttpTaskApi {
        HttpTaskApi::new(HttpTaskApiConfig::new("http://10.0.0.5:8000/v1"))
    }

    #[test]
    fn urls_join_base_and_endpoint() {
        let api = client();
        assert_eq!(
            api.url("tasks/tasks/42"),
            "http://10.0.0.5:8000/v1/tasks/tasks/42"
        );
        assert_eq!(api.url("tasks/users/"), "http://10.0.0.5:8000/v1/tasks/users/");
        assert_eq!(
            api.url("tasks/tasks/9/attachments/"),
            "http://10.0.0.5:8000/v1/tasks/tasks/9/attachments/"
        );
    }

    #[test]
    fn upload_timeout_is_configurable() {
        let config = HttpTaskApiConfig::new("http://h/v1")
            .with_upload_timeout(Duration::from_secs(60));
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
    }
}
