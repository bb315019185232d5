//! Attachment selection: turning the transport's loose "one of several
//! optional media fields" shape into a closed variant with one chosen
//! file per message.

use serde::{Deserialize, Serialize};

use crate::domain::dialogue::DialogueError;

/// Fallback upload name for photo attachments, which arrive from the
/// transport without a filename. Every other kind carries its own name.
pub const PHOTO_FALLBACK_NAME: &str = "image.jpg";

/// Reference to one downloadable file, owned by a single relay call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandle {
    /// Transport-side reference used to open the download stream.
    pub file_ref: String,
    /// Size declared by the transport, forwarded as Content-Length.
    pub declared_size: u64,
    /// Original filename, when the transport supplies one.
    pub declared_name: Option<String>,
}

impl FileHandle {
    pub fn new(file_ref: impl Into<String>, declared_size: u64, declared_name: Option<String>) -> Self {
        Self {
            file_ref: file_ref.into(),
            declared_size,
            declared_name,
        }
    }

    /// Name to send upstream: the declared name, or the image fallback.
    pub fn upload_name(&self) -> &str {
        self.declared_name.as_deref().unwrap_or(PHOTO_FALLBACK_NAME)
    }
}

/// One photo resolution variant; the transport sends several per photo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoVariant {
    pub file_ref: String,
    pub size: u64,
}

/// The attachment kinds the bot recognizes, as a closed variant.
///
/// The transport exposes these as separate optional fields on a message;
/// the adapter maps whichever is present into exactly one `Attachment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    Document(FileHandle),
    Animation(FileHandle),
    Audio(FileHandle),
    Video(FileHandle),
    /// Resolution variants in ascending size order, as delivered.
    Photo(Vec<PhotoVariant>),
}

impl Attachment {
    /// Selects the single file to relay.
    ///
    /// Photos pick the last (highest-resolution) variant and take the
    /// fallback name; an empty variant list counts as no attachment.
    pub fn select(&self) -> Result<FileHandle, DialogueError> {
        match self {
            Attachment::Document(h)
            | Attachment::Animation(h)
            | Attachment::Audio(h)
            | Attachment::Video(h) => Ok(h.clone()),
            Attachment::Photo(variants) => variants
                .last()
                .map(|v| FileHandle::new(v.file_ref.clone(), v.size, None))
                .ok_or(DialogueError::NoAttachment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_keeps_its_declared_name() {
        let doc = Attachment::Document(FileHandle::new("f1", 2048, Some("report.pdf".into())));
        let handle = doc.select().unwrap();
        assert_eq!(handle.upload_name(), "report.pdf");
        assert_eq!(handle.declared_size, 2048);
    }

    #[test]
    fn photo_picks_the_last_variant() {
        let photo = Attachment::Photo(vec![
            PhotoVariant {
                file_ref: "small".into(),
                size: 100,
            },
            PhotoVariant {
                file_ref: "medium".into(),
                size: 1000,
            },
            PhotoVariant {
                file_ref: "large".into(),
                size: 10_000,
            },
        ]);
        let handle = photo.select().unwrap();
        assert_eq!(handle.file_ref, "large");
        assert_eq!(handle.declared_size, 10_000);
    }

    #[test]
    fn photo_without_name_falls_back_to_image_default() {
        let photo = Attachment::Photo(vec![PhotoVariant {
            file_ref: "p".into(),
            size: 1,
        }]);
        assert_eq!(photo.select().unwrap().upload_name(), PHOTO_FALLBACK_NAME);
    }

    #[test]
    fn empty_photo_list_is_no_attachment() {
        let photo = Attachment::Photo(Vec::new());
        assert_eq!(photo.select().unwrap_err(), DialogueError::NoAttachment);
    }
}
