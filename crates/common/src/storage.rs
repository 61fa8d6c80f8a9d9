//! Content storage for uploaded poll photos and meme media.
//!
//! Files live under a single content root and are addressed by a relative
//! storage key such as `votes/Sport_photo1_1700000000.jpg`.

use std::path::PathBuf;

use crate::{AppError, AppResult, config::StorageConfig};

/// A file received from a client, before it is validated and stored.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// File name as sent by the client.
    pub file_name: String,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Create a new uploaded file.
    #[must_use]
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            data,
        }
    }
}

/// Stored file metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage key relative to the content root.
    pub key: String,
    /// Public URL to access the file.
    pub url: String,
    /// Lower-cased extension the file was stored with.
    pub extension: String,
    /// File size in bytes.
    pub size: u64,
}

/// Storage backend trait.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Write a file, creating parent directories as needed.
    async fn put(&self, key: &str, data: &[u8]) -> AppResult<()>;

    /// Delete a file. Deleting a missing file succeeds.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Get the public URL for a key.
    fn public_url(&self, key: &str) -> String;
}

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new local storage backend.
    #[must_use]
    pub const fn new(base_path: PathBuf, base_url: String) -> Self {
        Self {
            base_path,
            base_url,
        }
    }

    /// Create a local storage backend from the `storage` config section.
    #[must_use]
    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.base_path.clone(), config.base_url.clone())
    }
}

#[async_trait::async_trait]
impl StorageBackend for LocalStorage {
    async fn put(&self, key: &str, data: &[u8]) -> AppResult<()> {
        let path = self.base_path.join(key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(format!("Failed to create directory: {e}")))?;
        }

        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write file {key}: {e}")))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        let path = self.base_path.join(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to delete file {key}: {e}"
            ))),
        }
    }

    fn public_url(&self, key: &str) -> String {
        let path = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{path}", self.base_url.trim_end_matches('/'))
    }
}

/// Resolve the extension of an uploaded file name.
///
/// Takes the text after the last `.`, lower-cased. Names without a dot
/// resolve to `jpg`.
#[must_use]
pub fn resolve_extension(file_name: &str) -> String {
    file_name
        .rfind('.')
        .map_or_else(|| "jpg".to_string(), |pos| file_name[pos + 1..].to_lowercase())
}

/// Longest file name, in bytes, a storage key may end in.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Make a prefix safe to use in a file name.
///
/// Letters and digits of any script, `_` and `-` are kept. Every other
/// character is percent-encoded, so distinct prefixes stay distinct and no
/// path separator survives.
#[must_use]
pub fn sanitize_prefix(prefix: &str) -> String {
    let mut sanitized = String::with_capacity(prefix.len());
    let mut buf = [0u8; 4];
    for c in prefix.chars() {
        if c.is_alphanumeric() || c == '_' || c == '-' {
            sanitized.push(c);
        } else {
            for byte in c.encode_utf8(&mut buf).bytes() {
                sanitized.push_str(&format!("%{byte:02X}"));
            }
        }
    }
    sanitized
}

/// Build the storage key `{dir}/{prefix}_{unix_seconds}.{extension}`.
///
/// Fails with `Validation` when the file name would exceed
/// [`MAX_FILE_NAME_BYTES`].
pub fn build_storage_key(
    dir: &str,
    prefix: &str,
    unix_seconds: i64,
    extension: &str,
) -> AppResult<String> {
    let file_name = format!("{}_{unix_seconds}.{extension}", sanitize_prefix(prefix));
    if file_name.len() > MAX_FILE_NAME_BYTES {
        return Err(AppError::Validation(format!(
            "Name is too long for storage ({} bytes, max {MAX_FILE_NAME_BYTES})",
            file_name.len()
        )));
    }

    Ok(format!("{}/{file_name}", dir.trim_matches('/')))
}
