//! Local image store.
//!
//! Uploaded files live under `<root>/<folder>/<uuid>.<ext>` and are served by
//! the router at [`PUBLIC_MOUNT`]. Only URLs pointing back into that mount can
//! be deleted; anything else (remote URLs, `blob:` previews) is left alone.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const PUBLIC_MOUNT: &str = "/uploads";
pub const DEFAULT_FOLDER: &str = "images";

// No svg: files are served from the API origin and svg can carry script.
const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];
const FALLBACK_EXTENSION: &str = "jpg";

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    url_prefix: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: format!("{}{}", public_base_url.trim_end_matches('/'), PUBLIC_MOUNT),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, folder: &str, file: &str) -> String {
        format!("{}/{}/{}", self.url_prefix, folder, file)
    }

    /// Write the bytes under a fresh name and return the public URL.
    pub async fn save(&self, folder: &str, file_name: Option<&str>, bytes: &[u8]) -> AppResult<String> {
        validate_folder(folder)?;
        if bytes.is_empty() {
            return Err(AppError::BadRequest("file is empty".into()));
        }

        let file = format!("{}.{}", Uuid::new_v4(), extension_for(file_name));
        let dir = self.root.join(folder);
        fs::create_dir_all(&dir).await?;
        fs::write(dir.join(&file), bytes).await?;

        let url = self.public_url(folder, &file);
        tracing::info!(%url, size = bytes.len(), "image stored");
        Ok(url)
    }

    /// Remove the file behind `url`. Returns `false` when nothing was deleted.
    pub async fn delete(&self, url: &str) -> AppResult<bool> {
        let Some((folder, file)) = relative_path_from_url(url) else {
            tracing::debug!(%url, "not a stored image, skipping delete");
            return Ok(false);
        };

        match fs::remove_file(self.root.join(&folder).join(&file)).await {
            Ok(()) => {
                tracing::info!(%url, "image deleted");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(%url, "image already gone");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Delete without surfacing errors; used while cleaning up after row deletes.
    pub async fn delete_quietly(&self, url: &str) {
        if let Err(err) = self.delete(url).await {
            tracing::warn!(error = %err, %url, "image cleanup failed");
        }
    }
}

fn is_safe_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

pub fn validate_folder(folder: &str) -> AppResult<()> {
    let valid = !folder.is_empty()
        && folder.len() <= 64
        && folder
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'));
    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest(
            "folder may only contain letters, digits, '-' and '_'".into(),
        ))
    }
}

/// Lower-cased extension of an allowed image type, `jpg` otherwise.
pub fn extension_for(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// `/uploads/<folder>/<file>` part of a stored image URL. Host, query and
/// fragment are dropped, so every spelling of one file maps to the same key.
pub fn storage_key(url: &str) -> Option<String> {
    relative_path_from_url(url).map(|(folder, file)| format!("{PUBLIC_MOUNT}/{folder}/{file}"))
}

/// Split a stored image URL into `(folder, file)`.
pub fn relative_path_from_url(url: &str) -> Option<(String, String)> {
    if url.starts_with("blob:") {
        return None;
    }
    let marker = format!("{PUBLIC_MOUNT}/");
    let (_, rest) = url.split_once(marker.as_str())?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();

    let mut segments = rest.split('/');
    let folder = segments.next()?;
    let file = segments.next()?;
    if segments.next().is_some() {
        return None;
    }
    if validate_folder(folder).is_err() || !is_safe_segment(file) {
        return None;
    }
    Some((folder.to_string(), file.to_string()))
}
