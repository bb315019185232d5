//! Message router: wires inbound chat messages through the dialogue
//! engine and executes the resulting effects.
//!
//! The router owns the dialogue store and performs the one external
//! call a completed flow requires, through the [`TaskApi`] port or the
//! attachment relay. Whatever the outcome of that call, the
//! conversation ends up idle again.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

use crate::domain::dialogue::engine;
use crate::domain::dialogue::{Draft, Effect, FlowKind, IncomingMessage};
use crate::domain::ConversationId;
use crate::ports::{
    ChatTransport, DialogueStore, DialogueStoreError, NewComment, NewTask, RemoteResult, TaskApi,
    TaskApiError, TransportError,
};

use super::relay::{AttachmentRelay, RelayError};
use super::render::{render_submission, Reply};

/// The slash commands the bot understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    CreateUser,
    GetUser,
    CreateTask,
    GetTask,
    AddAttachmentToTask,
    CreateComment,
    GetComment,
}

impl Command {
    pub const ALL: [Command; 8] = [
        Command::Start,
        Command::CreateUser,
        Command::GetUser,
        Command::CreateTask,
        Command::GetTask,
        Command::AddAttachmentToTask,
        Command::CreateComment,
        Command::GetComment,
    ];

    /// Parses a command from message text. Accepts an optional
    /// `@botname` suffix and ignores anything after the first token.
    pub fn parse(text: &str) -> Option<Command> {
        let token = text.trim().split_whitespace().next()?;
        let token = token.split('@').next()?;
        match token {
            "/start" => Some(Command::Start),
            "/create_user" => Some(Command::CreateUser),
            "/get_user" => Some(Command::GetUser),
            "/create_task" => Some(Command::CreateTask),
            "/get_task" => Some(Command::GetTask),
            "/add_attachment_to_task" => Some(Command::AddAttachmentToTask),
            "/create_comment" => Some(Command::CreateComment),
            "/get_comment" => Some(Command::GetComment),
            _ => None,
        }
    }

    /// The command string without the leading slash.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Start => "start",
            Command::CreateUser => "create_user",
            Command::GetUser => "get_user",
            Command::CreateTask => "create_task",
            Command::GetTask => "get_task",
            Command::AddAttachmentToTask => "add_attachment_to_task",
            Command::CreateComment => "create_comment",
            Command::GetComment => "get_comment",
        }
    }

    /// Human description shown in the command menu.
    pub fn description(&self) -> &'static str {
        match self {
            Command::Start => "Show the command list",
            Command::CreateUser => "Create a user",
            Command::GetUser => "Look up a user",
            Command::CreateTask => "Create a task",
            Command::GetTask => "Look up a task",
            Command::AddAttachmentToTask => "Attach a file to a task",
            Command::CreateComment => "Create a comment",
            Command::GetComment => "Look up a comment",
        }
    }

    /// The flow this command initiates; /start initiates none.
    pub fn flow(&self) -> Option<FlowKind> {
        match self {
            Command::Start => None,
            Command::CreateUser => Some(FlowKind::CreateUser),
            Command::GetUser => Some(FlowKind::GetUser),
            Command::CreateTask => Some(FlowKind::CreateTask),
            Command::GetTask => Some(FlowKind::GetTask),
            Command::AddAttachmentToTask => Some(FlowKind::AddAttachment),
            Command::CreateComment => Some(FlowKind::CreateComment),
            Command::GetComment => Some(FlowKind::GetComment),
        }
    }
}

/// Failure while carrying out a completed flow's submission. Reported
/// to the user; never retried.
#[derive(Debug, Error)]
enum SubmitError {
    #[error("draft is missing field {0}")]
    MissingField(&'static str),

    #[error(transparent)]
    Api(#[from] TaskApiError),

    #[error(transparent)]
    Relay(#[from] RelayError),
}

/// Errors the router cannot handle locally; the polling loop logs them.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Store(#[from] DialogueStoreError),
}

/// Routes one conversation's messages through the dialogue engine.
pub struct Router {
    store: Arc<dyn DialogueStore>,
    api: Arc<dyn TaskApi>,
    transport: Arc<dyn ChatTransport>,
    relay: AttachmentRelay,
    welcome_image: Option<PathBuf>,
}

impl Router {
    pub fn new(
        store: Arc<dyn DialogueStore>,
        api: Arc<dyn TaskApi>,
        transport: Arc<dyn ChatTransport>,
        welcome_image: Option<PathBuf>,
    ) -> Self {
        let relay = AttachmentRelay::new(Arc::clone(&transport), Arc::clone(&api));
        Self {
            store,
            api,
            transport,
            relay,
            welcome_image,
        }
    }

    /// Handles one inbound message for one conversation.
    pub async fn handle(
        &self,
        chat: ConversationId,
        message: IncomingMessage,
    ) -> Result<(), RouterError> {
        let command = message.text.as_deref().and_then(Command::parse);

        if command == Some(Command::Start) {
            return self.welcome(chat).await;
        }

        let flow_hint = command.and_then(|c| c.flow());
        if let Some(command) = command {
            tracing::info!(%chat, command = command.name(), "starting command");
        }

        let active = self.store.get(chat).await?;
        let (next, effect) = engine::on_message(active, flow_hint, &message);

        match next {
            Some(dialogue) => self.store.put(chat, dialogue).await?,
            None => self.store.clear(chat).await?,
        }

        match effect {
            Effect::Prompt(prompt) => self.transport.send_text(chat, prompt).await?,
            Effect::Reject { reason, reprompt } => {
                tracing::info!(%chat, %reason, "input rejected");
                self.transport
                    .send_text(chat, &format!("{reason}. {reprompt}"))
                    .await?;
            }
            Effect::Submit { flow, draft } => self.submit(chat, flow, draft).await?,
            Effect::Ignored => {
                tracing::debug!(%chat, "message outside any dialogue, ignoring");
            }
        }
        Ok(())
    }

    /// /start: clear any active dialogue, send the welcome image and
    /// the command keyboard.
    async fn welcome(&self, chat: ConversationId) -> Result<(), RouterError> {
        tracing::info!(%chat, "sending welcome message");
        self.store.clear(chat).await?;

        if let Some(image) = &self.welcome_image {
            // A missing image should not take the bot down.
            if let Err(err) = self.transport.send_photo(chat, image).await {
                tracing::warn!(%chat, error = %err, "failed to send welcome image");
            }
        }

        let commands: Vec<String> = Command::ALL
            .iter()
            .map(|c| format!("/{}", c.name()))
            .collect();
        let command_refs: Vec<&str> = commands.iter().map(String::as_str).collect();
        self.transport
            .send_keyboard(chat, "Choose a command:", &command_refs)
            .await?;
        Ok(())
    }

    /// Performs the completed flow's one external call and reports the
    /// outcome. The dialogue was already cleared before this runs, so
    /// the conversation is idle again whatever happens here.
    async fn submit(
        &self,
        chat: ConversationId,
        flow: FlowKind,
        draft: Draft,
    ) -> Result<(), RouterError> {
        match self.perform(flow, &draft).await {
            Ok(result) => {
                tracing::info!(%chat, ?flow, status = result.status, success = result.success, "submission finished");
                match render_submission(flow, &draft, &result) {
                    Reply::Plain(text) => self.transport.send_text(chat, &text).await?,
                    Reply::Markdown(text) => self.transport.send_markdown(chat, &text).await?,
                }
            }
            Err(err) => {
                tracing::error!(%chat, ?flow, error = %err, "submission failed");
                self.transport
                    .send_text(chat, &format!("request failed: {err}"))
                    .await?;
            }
        }
        Ok(())
    }

    /// Builds and sends exactly one request for the completed draft.
    async fn perform(&self, flow: FlowKind, draft: &Draft) -> Result<RemoteResult, SubmitError> {
        let result = match flow {
            FlowKind::CreateUser => {
                let name = draft
                    .text("name")
                    .ok_or(SubmitError::MissingField("name"))?;
                self.api.create_user(name).await?
            }
            FlowKind::GetUser => {
                let user_id = draft
                    .int("user_id")
                    .ok_or(SubmitError::MissingField("user_id"))?;
                self.api.get_user(user_id).await?
            }
            FlowKind::CreateTask => {
                let task = NewTask {
                    title: draft
                        .text("title")
                        .ok_or(SubmitError::MissingField("title"))?
                        .to_string(),
                    description: draft.text("description").map(str::to_string),
                    reporter_id: draft
                        .int("reporter_id")
                        .ok_or(SubmitError::MissingField("reporter_id"))?,
                    assignee_id: draft.text("assignee_id").map(str::to_string),
                    related_task_ids: draft.list("related_task_ids"),
                };
                self.api.create_task(&task).await?
            }
            FlowKind::GetTask => {
                let task_id = draft
                    .int("task_id")
                    .ok_or(SubmitError::MissingField("task_id"))?;
                self.api.get_task(task_id).await?
            }
            FlowKind::CreateComment => {
                let comment = NewComment {
                    text: draft
                        .text("text")
                        .ok_or(SubmitError::MissingField("text"))?
                        .to_string(),
                    user_id: draft
                        .int("user_id")
                        .ok_or(SubmitError::MissingField("user_id"))?,
                    task_id: draft
                        .int("task_id")
                        .ok_or(SubmitError::MissingField("task_id"))?,
                };
                self.api.create_comment(&comment).await?
            }
            FlowKind::GetComment => {
                let comment_id = draft
                    .int("comment_id")
                    .ok_or(SubmitError::MissingField("comment_id"))?;
                self.api.get_comment(comment_id).await?
            }
            FlowKind::AddAttachment => {
                let task_id = draft
                    .int("task_id")
                    .ok_or(SubmitError::MissingField("task_id"))?;
                let handle = draft
                    .file("attachment")
                    .ok_or(SubmitError::MissingField("attachment"))?;
                self.relay.relay(task_id, handle).await?
            }
        };
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod command_parsing {
        use super::*;

        #[test]
        fn bare_commands_parse() {
            assert_eq!(Command::parse("/get_task"), Some(Command::GetTask));
            assert_eq!(Command::parse("/create_user"), Some(Command::CreateUser));
            assert_eq!(
                Command::parse("/add_attachment_to_task"),
                Some(Command::AddAttachmentToTask)
            );
        }

        #[test]
        fn bot_name_suffix_is_stripped() {
            assert_eq!(
                Command::parse("/get_task@task_courier_bot"),
                Some(Command::GetTask)
            );
        }

        #[test]
        fn trailing_text_is_ignored() {
            assert_eq!(Command::parse("/start now please"), Some(Command::Start));
        }

        #[test]
        fn plain_text_is_not_a_command() {
            assert_eq!(Command::parse("get_task"), None);
            assert_eq!(Command::parse("42"), None);
            assert_eq!(Command::parse("/unknown"), None);
        }

        #[test]
        fn every_command_except_start_initiates_a_flow() {
            for command in Command::ALL {
                match command {
                    Command::Start => assert!(command.flow().is_none()),
                    _ => assert!(command.flow().is_some()),
                }
            }
        }
    }
}
