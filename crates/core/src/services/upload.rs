//! Upload handling: validate client files and place them in content storage.

use std::sync::Arc;

use chrono::Utc;
use schoolboard_common::{
    AppError, AppResult, StorageBackend, StoredFile, UploadedFile, build_storage_key,
    resolve_extension,
};

/// Extensions accepted for poll photos.
pub const PHOTO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Extensions accepted for meme media.
pub const MEME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "mp4", "webm", "avi", "mov"];

/// A checked upload and the key it will be stored under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedUpload {
    pub key: String,
    pub extension: String,
}

/// Upload service.
#[derive(Clone)]
pub struct UploadService {
    storage: Arc<dyn StorageBackend>,
    max_file_size: usize,
}

impl UploadService {
    /// Create a new upload service.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, max_file_size: usize) -> Self {
        Self {
            storage,
            max_file_size,
        }
    }

    /// Check a file against the allowed extensions and size limits.
    ///
    /// Returns the resolved extension.
    pub fn check(&self, file: &UploadedFile, allowed_extensions: &[&str]) -> AppResult<String> {
        let extension = resolve_extension(&file.file_name);

        if !allowed_extensions.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Unsupported file type '{extension}', allowed: {}",
                allowed_extensions.join(", ")
            )));
        }
        if file.data.is_empty() {
            return Err(AppError::Validation("File is empty".to_string()));
        }
        if file.data.len() > self.max_file_size {
            return Err(AppError::Validation(format!(
                "File is too large ({} bytes, max {})",
                file.data.len(),
                self.max_file_size
            )));
        }

        Ok(extension)
    }

    /// Check a file and name it `{destination_dir}/{prefix}_{unix_seconds}.{ext}`.
    ///
    /// Nothing is written.
    pub fn plan(
        &self,
        file: &UploadedFile,
        allowed_extensions: &[&str],
        destination_dir: &str,
        prefix: &str,
        unix_seconds: i64,
    ) -> AppResult<PlannedUpload> {
        let extension = self.check(file, allowed_extensions)?;
        let key = build_storage_key(destination_dir, prefix, unix_seconds, &extension)?;
        Ok(PlannedUpload { key, extension })
    }

    /// Validate a file and write it to `{destination_dir}/{prefix}_{unix_seconds}.{ext}`.
    pub async fn accept(
        &self,
        file: &UploadedFile,
        allowed_extensions: &[&str],
        destination_dir: &str,
        prefix: &str,
    ) -> AppResult<StoredFile> {
        let planned = self.plan(
            file,
            allowed_extensions,
            destination_dir,
            prefix,
            Utc::now().timestamp(),
        )?;
        self.store(file, planned).await
    }

    /// Write a file under the key chosen by [`Self::plan`].
    pub async fn store(&self, file: &UploadedFile, planned: PlannedUpload) -> AppResult<StoredFile> {
        let PlannedUpload { key, extension } = planned;
        self.storage.put(&key, &file.data).await?;

        tracing::debug!(key = %key, size = file.data.len(), "Stored upload");

        Ok(StoredFile {
            url: self.storage.public_url(&key),
            key,
            extension,
            size: file.data.len() as u64,
        })
    }

    /// Remove a stored file. A missing file is not an error.
    pub async fn discard(&self, key: &str) -> AppResult<()> {
        self.storage.delete(key).await
    }

    /// Remove stored files, logging instead of failing.
    pub async fn discard_all<'a>(&self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if let Err(e) = self.discard(key).await {
                tracing::warn!(key = %key, error = %e, "Failed to remove stored file");
            }
        }
    }

    /// Public URL of a stored file.
    #[must_use]
    pub fn public_url(&self, key: &str) -> String {
        self.storage.public_url(key)
    }
}
