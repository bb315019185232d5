//! Task API endpoint configuration.

use serde::Deserialize;

use super::error::ValidationError;

/// Remote task-tracking API configuration.
///
/// Requests go to `http://{host}/{version}/...`.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskApiConfig {
    /// Host (and optional port) of the service.
    pub host: String,

    /// API version path segment.
    #[serde(default = "default_version")]
    pub version: String,

    /// Timeout for the attachment upload leg, in seconds.
    #[serde(default = "default_upload_timeout")]
    pub upload_timeout_secs: u64,
}

impl TaskApiConfig {
    /// Base URL, without a trailing slash.
    pub fn base_url(&self) -> String {
        format!("http://{}/{}", self.host, self.version)
    }

    /// Validate Task API configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.is_empty() {
            return Err(ValidationError::MissingRequired("task_api.host"));
        }
        if self.version.is_empty() {
            return Err(ValidationError::MissingRequired("task_api.version"));
        }
        if self.upload_timeout_secs == 0 || self.upload_timeout_secs > 3600 {
            return Err(ValidationError::InvalidUploadTimeout);
        }
        Ok(())
    }
}

fn default_version() -> String {
    "v1".to_string()
}

fn default_upload_timeout() -> u64 {
    300
}
