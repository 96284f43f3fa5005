//! Pending image attachment
//!
//! Images are uploaded separately and referenced by id in the next chat
//! request. The checks here mirror what the upload endpoint accepts so a bad
//! file is rejected before any bytes are sent.

use std::path::Path;

use thiserror::Error;

use crate::error::ErrorCategory;

/// File extensions the upload endpoint accepts (lowercase, without dot).
pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Largest accepted upload: 10 MiB.
pub const MAX_ATTACHMENT_BYTES: u64 = 10 * 1024 * 1024;

/// Why an attachment was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("File type not allowed: {file_name}. Use: .jpg, .jpeg, .png, .gif, .webp")]
    UnsupportedType { file_name: String },

    #[error("File too large ({size} bytes). Max 10 MB.")]
    TooLarge { size: u64 },
}

impl AttachmentError {
    /// Always [`ErrorCategory::User`]: the user picked a file the server refuses.
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::User
    }
}

/// Check a file name and size against the upload rules.
pub fn validate_attachment(file_name: &str, size: u64) -> Result<(), AttachmentError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase);

    match extension {
        Some(ext) if ALLOWED_EXTENSIONS.contains(&ext.as_str()) => {}
        _ => {
            return Err(AttachmentError::UnsupportedType {
                file_name: file_name.to_string(),
            })
        }
    }

    if size > MAX_ATTACHMENT_BYTES {
        return Err(AttachmentError::TooLarge { size });
    }

    Ok(())
}

/// An uploaded image waiting to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub image_id: String,
    pub file_name: String,
    pub size: u64,
}

/// At most one pending attachment.
#[derive(Debug, Clone, Default)]
pub struct AttachmentState {
    pending: Option<Attachment>,
}

impl AttachmentState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and hold an attachment, replacing any previous one.
    ///
    /// On error the previous attachment is kept.
    pub fn attach(
        &mut self,
        image_id: impl Into<String>,
        file_name: impl Into<String>,
        size: u64,
    ) -> Result<&Attachment, AttachmentError> {
        let file_name = file_name.into();
        validate_attachment(&file_name, size)?;
        Ok(self.pending.insert(Attachment {
            image_id: image_id.into(),
            file_name,
            size,
        }))
    }

    pub fn pending(&self) -> Option<&Attachment> {
        self.pending.as_ref()
    }

    pub fn has_attachment(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the pending attachment without sending it.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// Hand the image id to an outgoing message; the attachment is consumed.
    pub fn take_image_id(&mut self) -> Option<String> {
        self.pending.take().map(|a| a.image_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_errors_are_user_errors() {
        let err = validate_attachment("notes.pdf", 1).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::User);
        assert!(!err.category().is_retryable());

        let err = validate_attachment("big.png", MAX_ATTACHMENT_BYTES + 1).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::User);
    }

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        for name in ["a.jpg", "b.JPEG", "c.Png", "d.gif", "e.webp"] {
            assert!(validate_attachment(name, 1).is_ok(), "{}", name);
        }
    }

    #[test]
    fn test_rejects_other_types() {
        for name in ["doc.pdf", "noext", "archive.png.zip", ".png"] {
            assert!(
                matches!(
                    validate_attachment(name, 1),
                    Err(AttachmentError::UnsupportedType { .. })
                ),
                "{}",
                name
            );
        }
    }

    #[test]
    fn test_size_limit_inclusive() {
        assert!(validate_attachment("a.png", MAX_ATTACHMENT_BYTES).is_ok());
        assert_eq!(
            validate_attachment("a.png", MAX_ATTACHMENT_BYTES + 1),
            Err(AttachmentError::TooLarge {
                size: MAX_ATTACHMENT_BYTES + 1
            })
        );
    }

    #[test]
    fn test_attach_and_take() {
        let mut state = AttachmentState::new();
        state.attach("img-1.png", "leaf.png", 2048).unwrap();
        assert!(state.has_attachment());
        assert_eq!(state.pending().map(|a| a.size), Some(2048));

        assert_eq!(state.take_image_id(), Some("img-1.png".to_string()));
        assert!(!state.has_attachment());
        assert_eq!(state.take_image_id(), None);
    }

    #[test]
    fn test_failed_attach_keeps_previous() {
        let mut state = AttachmentState::new();
        state.attach("img-1.png", "leaf.png", 10).unwrap();
        assert!(state.attach("img-2", "notes.txt", 10).is_err());
        assert_eq!(state.pending().map(|a| a.image_id.as_str()), Some("img-1.png"));
    }

    #[test]
    fn test_clear() {
        let mut state = AttachmentState::new();
        state.attach("img-1.webp", "x.webp", 10).unwrap();
        state.clear();
        assert!(state.pending().is_none());
    }
}
