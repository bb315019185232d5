//! Telegram Bot API client - long polling, replies and file downloads.
//!
//! Implements the [`ChatTransport`] port over reqwest. The inbound side
//! (`get_updates`) is consumed directly by the polling loop in `main`;
//! the core only sees the port.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

use crate::domain::ConversationId;
use crate::ports::{ByteStream, ChatTransport, FileDownload, TransportError};

use super::types::{ApiResponse, BotCommand, File, Update};

/// Configuration for the Telegram client.
#[derive(Debug, Clone)]
pub struct TelegramClientConfig {
    token: Secret<String>,
    /// Base URL of the Bot API (overridable for tests).
    pub api_url: String,
    /// Long-poll timeout for getUpdates.
    pub poll_timeout: Duration,
}

impl TelegramClientConfig {
    /// Creates a configuration with the given bot token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            api_url: "https://api.telegram.org".to_string(),
            poll_timeout: Duration::from_secs(30),
        }
    }

    /// Sets the Bot API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the long-poll timeout.
    pub fn with_poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// reqwest-backed Telegram Bot API client.
pub struct TelegramClient {
    config: TelegramClientConfig,
    client: Client,
}

impl TelegramClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: TelegramClientConfig) -> Self {
        let client = Client::new();
        Self { config, client }
    }

    /// Builds a Bot API method URL.
    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.config.api_url, self.config.token(), method)
    }

    /// Builds a file download URL from a getFile path.
    fn file_url(&self, file_path: &str) -> String {
        format!(
            "{}/file/bot{}/{}",
            self.config.api_url,
            self.config.token(),
            file_path
        )
    }

    /// Unwraps the Bot API response envelope.
    fn unwrap_envelope<T>(envelope: ApiResponse<T>) -> Result<T, TransportError> {
        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| TransportError::api("ok response without result"))
        } else {
            Err(TransportError::api(
                envelope.description.unwrap_or_else(|| "unknown error".into()),
            ))
        }
    }

    /// Calls a JSON-body method and decodes the envelope.
    async fn call<T: serde::de::DeserializeOwned>(
        &self,
        method: &str,
        body: serde_json::Value,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&body)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        let envelope: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        Self::unwrap_envelope(envelope)
    }

    /// Long-polls for the next batch of updates.
    ///
    /// The HTTP timeout is padded past the poll timeout so the server
    /// side always closes the poll first.
    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, TransportError> {
        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(self.config.poll_timeout + Duration::from_secs(10))
            .json(&json!({
                "offset": offset,
                "timeout": self.config.poll_timeout.as_secs(),
                "allowed_updates": ["message"],
            }))
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        let envelope: ApiResponse<Vec<Update>> = response
            .json()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        Self::unwrap_envelope(envelope)
    }

    /// Registers the bot's command list with the platform.
    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TransportError> {
        let _: bool = self
            .call("setMyCommands", json!({ "commands": commands }))
            .await?;
        Ok(())
    }

    async fn send_message(
        &self,
        chat: ConversationId,
        text: &str,
        markdown: bool,
        keyboard: Option<&[&str]>,
    ) -> Result<(), TransportError> {
        let mut body = json!({
            "chat_id": chat.as_i64(),
            "text": text,
        });
        if markdown {
            body["parse_mode"] = json!("Markdown");
        }
        if let Some(commands) = keyboard {
            body["reply_markup"] = json!({
                "keyboard": [commands.iter().map(|c| json!({"text": c})).collect::<Vec<_>>()],
                "resize_keyboard": true,
            });
        }
        let _: serde_json::Value = self.call("sendMessage", body).await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn send_text(&self, chat: ConversationId, text: &str) -> Result<(), TransportError> {
        self.send_message(chat, text, false, None).await
    }

    async fn send_markdown(&self, chat: ConversationId, text: &str) -> Result<(), TransportError> {
        self.send_message(chat, text, true, None).await
    }

    async fn send_photo(&self, chat: ConversationId, path: &Path) -> Result<(), TransportError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| TransportError::Io(e.to_string()))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let form = Form::new()
            .text("chat_id", chat.as_i64().to_string())
            .part("photo", Part::bytes(bytes).file_name(filename));
        let response = self
            .client
            .post(self.method_url("sendPhoto"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        let envelope: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        Self::unwrap_envelope(envelope).map(|_| ())
    }

    async fn send_keyboard(
        &self,
        chat: ConversationId,
        text: &str,
        commands: &[&str],
    ) -> Result<(), TransportError> {
        self.send_message(chat, text, false, Some(commands)).await
    }

    async fn download_file(&self, file_ref: &str) -> Result<FileDownload, TransportError> {
        let file: File = self
            .call("getFile", json!({ "file_id": file_ref }))
            .await?;
        let file_path = file.file_path.ok_or(TransportError::MissingFilePath)?;

        let response = self
            .client
            .get(self.file_url(&file_path))
            .send()
            .await
            .map_err(|e| TransportError::network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(TransportError::api(format!(
                "file download failed with status {}",
                response.status()
            )));
        }

        let size = file
            .file_size
            .or(response.content_length())
            .unwrap_or_default();
        let stream: ByteStream = Box::pin(
            response
                .bytes_stream()
                .map(|chunk| chunk.map_err(|e| TransportError::network(e.to_string()))),
        );
        Ok(FileDownload { size, stream })
    }
}
