//! Post attachment checks and storage.

use std::sync::Arc;

use agora_common::{AppError, AppResult, StorageBackend, UploadedFile, generate_storage_key};

/// Shared storage handle.
pub type StorageService = Arc<dyn StorageBackend>;

/// Largest accepted attachment (5 MiB).
pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

/// Accepted attachment formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// JPEG format
    Jpeg,
    /// PNG format
    Png,
    /// GIF format
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    #[must_use]
    pub const fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
        }
    }

    /// Detect format from a file extension (case-insensitive).
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "gif" => Some(Self::Gif),
            _ => None,
        }
    }

    /// Detect format from a client-supplied file name.
    #[must_use]
    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        Self::from_extension(ext)
    }
}

/// An uploaded image that has not been checked yet.
#[derive(Debug, Clone)]
pub struct Attachment {
    /// File name as sent by the client.
    pub file_name: String,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl Attachment {
    /// Check format and size, returning the detected format.
    pub fn validate(&self) -> AppResult<ImageFormat> {
        let format = ImageFormat::from_file_name(&self.file_name).ok_or_else(|| {
            AppError::Validation(
                "Unsupported image format. Only JPG, JPEG, PNG and GIF are allowed".to_string(),
            )
        })?;

        if self.data.len() > MAX_ATTACHMENT_BYTES {
            return Err(AppError::Validation(
                "Image size must not exceed 5MB".to_string(),
            ));
        }

        Ok(format)
    }
}

/// Attachment storage for posts.
#[derive(Clone)]
pub struct MediaService {
    storage: StorageService,
}

impl MediaService {
    /// Create a new media service.
    #[must_use]
    pub const fn new(storage: StorageService) -> Self {
        Self { storage }
    }

    /// Store an attachment that already passed [`Attachment::validate`].
    pub async fn store(
        &self,
        attachment: &Attachment,
        format: ImageFormat,
    ) -> AppResult<UploadedFile> {
        let key = generate_storage_key(&attachment.file_name);
        self.storage
            .upload(&key, &attachment.data, format.mime_type())
            .await
    }

    /// Remove a stored attachment, logging instead of failing.
    pub async fn discard(&self, file: &UploadedFile) {
        if let Err(e) = self.storage.delete(&file.key).await {
            tracing::warn!(key = %file.key, error = %e, "Failed to remove orphaned attachment");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use agora_common::LocalStorage;

    fn attachment(name: &str, size: usize) -> Attachment {
        Attachment {
            file_name: name.to_string(),
            data: vec![0u8; size],
        }
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(ImageFormat::from_file_name("cat.JPG"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("cat.jpeg"), Some(ImageFormat::Jpeg));
        assert_eq!(ImageFormat::from_file_name("a.b.png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("loop.gif"), Some(ImageFormat::Gif));
        assert_eq!(ImageFormat::from_file_name("scan.bmp"), None);
        assert_eq!(ImageFormat::from_file_name("png"), None);
        assert_eq!(ImageFormat::from_file_name(".png"), Some(ImageFormat::Png));
        assert_eq!(ImageFormat::from_file_name("photo."), None);
    }

    #[test]
    fn test_validate_rejects_bmp() {
        match attachment("scan.bmp", 10).validate() {
            Err(AppError::Validation(msg)) => assert!(msg.contains("format")),
            _ => panic!("Expected Validation error"),
        }
    }

    #[test]
    fn test_validate_size_limit() {
        assert!(attachment("big.png", MAX_ATTACHMENT_BYTES).validate().is_ok());
        assert!(matches!(
            attachment("big.png", MAX_ATTACHMENT_BYTES + 1).validate(),
            Err(AppError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_store_and_discard() {
        let dir = std::env::temp_dir().join(format!("agora-media-{}", uuid::Uuid::new_v4()));
        let storage: StorageService =
            Arc::new(LocalStorage::new(dir.clone(), "/uploads".to_string()));
        let media = MediaService::new(storage.clone());

        let upload = attachment("Photo.PNG", 16);
        let format = upload.validate().unwrap();
        let stored = media.store(&upload, format).await.unwrap();

        assert!(stored.url.starts_with("/uploads/"));
        assert!(stored.key.ends_with(".png"));
        assert_eq!(stored.content_type, "image/png");
        assert!(storage.exists(&stored.key).await.unwrap());

        media.discard(&stored).await;
        assert!(!storage.exists(&stored.key).await.unwrap());

        let _ = tokio::fs::remove_dir_all(dir).await;
    }
}
