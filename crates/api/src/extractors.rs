//! Request extractors.

use axum::{
    extract::{FromRequestParts, Multipart, Query},
    http::request::Parts,
};
use schoolboard_common::{AppError, AppResult, UploadedFile};
use std::collections::HashMap;

use crate::middleware::AppState;

/// Header carrying the admin passphrase on destructive routes.
pub const ADMIN_PASSPHRASE_HEADER: &str = "x-admin-passphrase";

/// Query string extractor whose rejections use the JSON error body.
#[derive(Debug, Clone, Copy, Default, FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct QueryParams<T>(pub T);

/// Proof that the request carried the admin passphrase.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let passphrase = parts
            .headers
            .get(ADMIN_PASSPHRASE_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Forbidden("Admin passphrase required".to_string()))?;

        state.admin_gate.check(passphrase)?;
        Ok(Self)
    }
}

/// Read the named file fields of a multipart body.
///
/// Other fields are skipped. A part with neither a file name nor content
/// counts as absent, which is what browsers send for an unused file input.
pub async fn read_files(
    multipart: &mut Multipart,
    names: &[&str],
) -> AppResult<HashMap<String, UploadedFile>> {
    let mut files = HashMap::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();
        if !names.contains(&name.as_str()) {
            continue;
        }

        let file_name = field.file_name().unwrap_or("").to_string();
        let data = field.bytes().await?.to_vec();
        if file_name.is_empty() && data.is_empty() {
            continue;
        }

        files.insert(name, UploadedFile::new(file_name, data));
    }

    Ok(files)
}

/// Remove a required file from the fields read by [`read_files`].
pub fn require_file(
    files: &mut HashMap<String, UploadedFile>,
    name: &str,
) -> AppResult<UploadedFile> {
    files
        .remove(name)
        .ok_or_else(|| AppError::Validation(format!("File field '{name}' is required")))
}
