//! Disk-backed media store: the upload gateway for site images and the byte
//! source for stored videos.
//!
//! Objects live under a namespaced root (`images/<kind>/`, `videos/`) and are
//! served back through the public `/media` and `/api/video` routes. Names
//! combine the kind discriminator, a millisecond timestamp, and a random
//! suffix, so no coordination step is needed to avoid collisions.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::errors::AppError;

/// Upload ceiling for image assets (5 MB).
pub const IMAGE_SIZE_LIMIT: usize = 5 * 1024 * 1024;

/// Subdirectory for uploaded images.
const IMAGES_DIR: &str = "images";

/// Subdirectory for video objects.
const VIDEOS_DIR: &str = "videos";

/// A stored object as reported back to the caller.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    pub url: String,
    pub file_name: String,
    pub file_path: String,
}

/// Outcome of aborting a pending upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortOutcome {
    /// The compensating delete succeeded; nothing is left behind.
    Compensated,
    /// The compensating delete itself failed; the object is left in storage
    /// and needs manual cleanup.
    Orphaned,
}

/// An uploaded object whose dependent write has not completed yet.
///
/// `commit` finalizes the upload once the dependent write succeeded; `abort`
/// issues the compensating delete when it did not. There is no garbage
/// collection pass behind this, so an [`AbortOutcome::Orphaned`] object stays
/// in storage.
#[derive(Debug)]
pub struct PendingUpload {
    object: StoredObject,
    abs_path: PathBuf,
}

impl PendingUpload {
    pub fn object(&self) -> &StoredObject {
        &self.object
    }

    /// Finalize the upload.
    pub fn commit(self) -> StoredObject {
        self.object
    }

    /// Delete the just-uploaded object after a dependent write failed.
    pub async fn abort(self) -> AbortOutcome {
        match tokio::fs::remove_file(&self.abs_path).await {
            Ok(()) => {
                tracing::info!(path = %self.object.file_path, "Compensated upload after failed write");
                AbortOutcome::Compensated
            }
            Err(e) => {
                tracing::warn!(path = %self.object.file_path, error = %e, "Compensating delete failed; object orphaned");
                AbortOutcome::Orphaned
            }
        }
    }
}

/// Disk-backed object store rooted at a configured media directory.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl MediaStore {
    pub fn new(root: PathBuf, public_base_url: &str) -> Self {
        Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create the namespaced subdirectories if they are missing.
    pub async fn ensure_dirs(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(self.root.join(IMAGES_DIR)).await?;
        tokio::fs::create_dir_all(self.root.join(VIDEOS_DIR)).await?;
        Ok(())
    }

    /// Validate an incoming image payload. Runs before any disk write.
    pub fn validate_image(content_type: &str, size: usize) -> Result<(), AppError> {
        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(format!(
                "Only image uploads are accepted, got {}",
                content_type
            )));
        }
        if size > IMAGE_SIZE_LIMIT {
            return Err(AppError::Validation(
                "Image exceeds the 5 MB size limit".to_string(),
            ));
        }
        Ok(())
    }

    /// Store an image and finalize it immediately.
    pub async fn store_image(
        &self,
        kind: &str,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<StoredObject, AppError> {
        Ok(self
            .reserve_image(kind, original_name, content_type, bytes)
            .await?
            .commit())
    }

    /// Store an image but leave it pending so a failed dependent write can
    /// compensate with a delete.
    pub async fn reserve_image(
        &self,
        kind: &str,
        original_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<PendingUpload, AppError> {
        Self::validate_image(content_type, bytes.len())?;

        let file_name = object_name(kind, original_name, content_type);
        let rel_path = format!("{}/{}/{}", IMAGES_DIR, kind, file_name);
        let abs_path = self.root.join(IMAGES_DIR).join(kind).join(&file_name);

        if let Some(parent) = abs_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Internal(format!("Media directory error: {}", e)))?;
        }

        // create_new keeps collisions from silently overwriting an object.
        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&abs_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;
        file.write_all(bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;
        file.flush()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        let object = StoredObject {
            url: format!("{}/media/{}", self.public_base_url, rel_path),
            file_name,
            file_path: rel_path,
        };

        tracing::debug!(path = %object.file_path, size = bytes.len(), "Stored media object");

        Ok(PendingUpload { object, abs_path })
    }

    /// Best-effort delete of a stored object. Failures are logged as warnings
    /// and never block the wider request.
    pub async fn remove(&self, rel_path: &str) {
        let Some(abs_path) = self.resolve(rel_path) else {
            tracing::warn!(path = rel_path, "Refusing to delete suspicious media path");
            return;
        };
        if let Err(e) = tokio::fs::remove_file(&abs_path).await {
            tracing::warn!(path = rel_path, error = %e, "Failed to delete media object");
        }
    }

    /// Read a stored object in full.
    pub async fn read(&self, rel_path: &str) -> Result<Option<Vec<u8>>, AppError> {
        let Some(abs_path) = self.resolve(rel_path) else {
            return Ok(None);
        };
        match tokio::fs::read(&abs_path).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Internal(format!("Media read error: {}", e))),
        }
    }

    /// Confirm a video exists by listing the videos directory. The listing
    /// gives a precise not-found signal distinct from read failures.
    pub async fn video_exists(&self, file_name: &str) -> Result<bool, AppError> {
        let dir = self.root.join(VIDEOS_DIR);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(AppError::Internal(format!("Media listing error: {}", e))),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AppError::Internal(format!("Media listing error: {}", e)))?
        {
            if entry.file_name().to_string_lossy() == file_name {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Read a whole video into memory. Bounds this server to small/medium
    /// files; there is no streaming path.
    pub async fn read_video(&self, file_name: &str) -> Result<Vec<u8>, AppError> {
        let abs_path = self.root.join(VIDEOS_DIR).join(file_name);
        tokio::fs::read(&abs_path)
            .await
            .map_err(|e| AppError::Internal(format!("Video read error: {}", e)))
    }

    /// Resolve a media-relative path, rejecting traversal attempts.
    fn resolve(&self, rel_path: &str) -> Option<PathBuf> {
        if !is_safe_rel_path(rel_path) {
            return None;
        }
        Some(self.root.join(rel_path))
    }
}

/// Reject absolute paths and any `..` component.
pub fn is_safe_rel_path(rel_path: &str) -> bool {
    let path = Path::new(rel_path);
    !path.is_absolute()
        && path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)))
}

/// A bare file name: no separators, no traversal.
pub fn is_safe_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

/// Generate a collision-resistant object name preserving the original
/// extension: `{kind}-{unix_millis}-{random}.{ext}`.
fn object_name(kind: &str, original_name: &str, content_type: &str) -> String {
    let ext = extension_for(original_name, content_type);
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(8)
        .collect();
    format!("{}-{}-{}.{}", kind, millis, suffix, ext)
}

/// Extension from the original file name, falling back to the MIME subtype.
fn extension_for(original_name: &str, content_type: &str) -> String {
    let from_name = original_name
        .rsplit('.')
        .next()
        .filter(|e| !e.is_empty() && *e != original_name && e.len() <= 8);
    let raw = from_name.unwrap_or_else(|| {
        content_type
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("bin")
    });
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        "bin".to_string()
    } else {
        cleaned
    }
}

/// Guess a Content-Type from a file extension.
pub fn content_type_for_extension(path: &str) -> &'static str {
    let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "mp4" | "m4v" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_image_rejects_non_image() {
        let err = MediaStore::validate_image("video/mp4", 100).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validate_image_rejects_oversize() {
        let err = MediaStore::validate_image("image/png", IMAGE_SIZE_LIMIT + 1).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_validate_image_accepts_png_at_limit() {
        assert!(MediaStore::validate_image("image/png", IMAGE_SIZE_LIMIT).is_ok());
    }

    #[test]
    fn test_object_name_shape() {
        let name = object_name("background", "studio photo.PNG", "image/png");
        assert!(name.starts_with("background-"));
        assert!(name.ends_with(".png"));
        // kind, millis, random suffix
        assert_eq!(name.split('-').count(), 3);
    }

    #[test]
    fn test_extension_falls_back_to_content_type() {
        assert_eq!(extension_for("upload", "image/webp"), "webp");
        assert_eq!(extension_for("", "image/jpeg"), "jpeg");
    }

    #[test]
    fn test_safe_paths() {
        assert!(is_safe_rel_path("images/background/a.png"));
        assert!(!is_safe_rel_path("../etc/passwd"));
        assert!(!is_safe_rel_path("/etc/passwd"));
        assert!(is_safe_file_name("clip.mp4"));
        assert!(!is_safe_file_name("../clip.mp4"));
        assert!(!is_safe_file_name("a/b.mp4"));
    }

    #[tokio::test]
    async fn test_store_and_compensate() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf(), "http://localhost:8080/");
        store.ensure_dirs().await.unwrap();

        let pending = store
            .reserve_image("navigation", "nav.png", "image/png", b"fake-png-bytes")
            .await
            .unwrap();
        let rel_path = pending.object().file_path.clone();
        assert!(pending.object().url.contains("/media/images/navigation/"));
        assert!(dir.path().join(&rel_path).exists());

        assert_eq!(pending.abort().await, AbortOutcome::Compensated);
        assert!(!dir.path().join(&rel_path).exists());
    }

    #[tokio::test]
    async fn test_rejected_upload_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf(), "http://localhost:8080");
        store.ensure_dirs().await.unwrap();

        let err = store
            .store_image("background", "movie.mp4", "video/mp4", b"not an image")
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_ERROR");

        let mut entries = tokio::fs::read_dir(dir.path().join("images")).await.unwrap();
        // only namespaced dirs may exist, no files under them yet
        while let Some(entry) = entries.next_entry().await.unwrap() {
            let mut inner = tokio::fs::read_dir(entry.path()).await.unwrap();
            assert!(inner.next_entry().await.unwrap().is_none());
        }
    }

    #[tokio::test]
    async fn test_video_exists_via_listing() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = MediaStore::new(dir.path().to_path_buf(), "http://localhost:8080");
        store.ensure_dirs().await.unwrap();

        tokio::fs::write(dir.path().join("videos").join("reel.mp4"), b"0123456789")
            .await
            .unwrap();

        assert!(store.video_exists("reel.mp4").await.unwrap());
        assert!(!store.video_exists("missing.mp4").await.unwrap());
        assert_eq!(store.read_video("reel.mp4").await.unwrap().len(), 10);
    }
}
