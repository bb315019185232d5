//! Telegram Bot API wire types.
//!
//! Only the fields the bot actually reads are modelled; everything else
//! in an update is ignored by serde.

use serde::{Deserialize, Serialize};

use crate::domain::attachment::{Attachment, FileHandle, PhotoVariant};
use crate::domain::dialogue::IncomingMessage;
use crate::domain::ConversationId;

/// Envelope every Bot API method responds with.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
}

/// One long-poll update.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// An inbound chat message with the media fields the bot recognizes.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    pub text: Option<String>,
    pub document: Option<Document>,
    pub animation: Option<Animation>,
    pub audio: Option<Audio>,
    pub video: Option<Video>,
    /// Resolution variants, smallest first.
    pub photo: Option<Vec<PhotoSize>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Animation {
    pub file_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Audio {
    pub file_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub file_id: String,
    pub file_name: Option<String>,
    pub file_size: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PhotoSize {
    pub file_id: String,
    pub file_size: Option<u64>,
}

/// File metadata returned by getFile; `file_path` opens the download.
#[derive(Debug, Clone, Deserialize)]
pub struct File {
    pub file_id: String,
    pub file_size: Option<u64>,
    pub file_path: Option<String>,
}

/// A command registered via setMyCommands.
#[derive(Debug, Clone, Serialize)]
pub struct BotCommand {
    pub command: &'static str,
    pub description: &'static str,
}

impl Message {
    pub fn conversation(&self) -> ConversationId {
        ConversationId::new(self.chat.id)
    }

    /// Maps the transport's loose media fields to the closed domain
    /// attachment variant. Animation wins over document: Telegram sets
    /// both for GIFs and the animation entry is the meaningful one.
    pub fn attachment(&self) -> Option<Attachment> {
        if let Some(animation) = &self.animation {
            return Some(Attachment::Animation(FileHandle::new(
                animation.file_id.clone(),
                animation.file_size.unwrap_or(0),
                animation.file_name.clone(),
            )));
        }
        if let Some(document) = &self.document {
            return Some(Attachment::Document(FileHandle::new(
                document.file_id.clone(),
                document.file_size.unwrap_or(0),
                document.file_name.clone(),
            )));
        }
        if let Some(audio) = &self.audio {
            return Some(Attachment::Audio(FileHandle::new(
                audio.file_id.clone(),
                audio.file_size.unwrap_or(0),
                audio.file_name.clone(),
            )));
        }
        if let Some(video) = &self.video {
            return Some(Attachment::Video(FileHandle::new(
                video.file_id.clone(),
                video.file_size.unwrap_or(0),
                video.file_name.clone(),
            )));
        }
        if let Some(photo) = &self.photo {
            let variants = photo
                .iter()
                .map(|p| PhotoVariant {
                    file_ref: p.file_id.clone(),
                    size: p.file_size.unwrap_or(0),
                })
                .collect();
            return Some(Attachment::Photo(variants));
        }
        None
    }

    /// Strips transport detail down to what the dialogue engine reads.
    pub fn to_incoming(&self) -> IncomingMessage {
        IncomingMessage {
            text: self.text.clone(),
            attachment: self.attachment(),
        }
    }
}
