//! Upload staging: filename validation, sanitization, and scoped temp files.
//!
//! Every accepted upload is written under the configured upload directory
//! keyed by its sanitized filename, handed to the vision collaborator, and
//! deleted when the request's [`StagedUpload`] guard drops — on every exit
//! path, success or failure.
//!
//! Concurrent requests whose filenames sanitize to the same name race on
//! the staging path: last writer wins and the first guard to drop removes
//! the file. This is a known limitation, not coordinated away.

use crate::Result;
use std::path::{Path, PathBuf};

/// File extensions accepted by the upload gatekeeper (lowercase).
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Check whether a claimed filename carries an allowed image extension.
///
/// The comparison is case-insensitive; a filename without any `.` is
/// rejected outright.
pub fn is_allowed_filename(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, ext)) => ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Reduce a claimed filename to a single safe path component.
///
/// Directory parts are stripped (both `/` and `\` separators), every
/// character outside `[A-Za-z0-9._-]` becomes `_`, and leading dots are
/// dropped so the result can never name a parent directory or hide itself.
/// Returns `"upload"` if nothing survives.
pub fn sanitize_filename(filename: &str) -> String {
    let basename = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Create the upload staging directory if it does not exist.
///
/// Called once at server startup.
pub fn ensure_upload_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    Ok(())
}

/// A staged upload scoped to one request.
///
/// The file is written on creation and removed when the guard drops,
/// regardless of which handler branch returned.
#[derive(Debug)]
pub struct StagedUpload {
    path: PathBuf,
}

impl StagedUpload {
    /// Write `bytes` under `dir` keyed by the (already sanitized) filename.
    pub async fn create(dir: &Path, filename: &str, bytes: &[u8]) -> Result<Self> {
        let path = dir.join(filename);
        tokio::fs::write(&path, bytes).await?;
        Ok(Self { path })
    }

    /// Path of the staged file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove staged upload {}: {}", self.path.display(), e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_allowed_extensions_case_insensitive() {
        assert!(is_allowed_filename("photo.png"));
        assert!(is_allowed_filename("photo.PNG"));
        assert!(is_allowed_filename("photo.Jpg"));
        assert!(is_allowed_filename("photo.JPEG"));
    }

    #[test]
    fn test_disallowed_extensions() {
        assert!(!is_allowed_filename("photo.gif"));
        assert!(!is_allowed_filename("photo.pdf"));
        assert!(!is_allowed_filename("photo.png.exe"));
        assert!(!is_allowed_filename("photo"));
        assert!(!is_allowed_filename(""));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "passwd.png");
        assert_eq!(sanitize_filename("/absolute/path/photo.jpg"), "photo.jpg");
        assert_eq!(sanitize_filename("C:\\Users\\me\\photo.jpg"), "photo.jpg");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize_filename("my photo (1).png"), "my_photo__1_.png");
        assert_eq!(sanitize_filename("snap\u{00e9}.jpg"), "snap_.jpg");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_filename(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_filename("..png"), "png");
    }

    #[test]
    fn test_sanitize_never_empty() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("///"), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn test_ensure_upload_dir_creates_missing() {
        let dir = tempdir().unwrap();
        let staging = dir.path().join("staging");
        assert!(!staging.exists());

        ensure_upload_dir(&staging).unwrap();
        assert!(staging.is_dir());

        // Idempotent on an existing directory
        ensure_upload_dir(&staging).unwrap();
    }

    #[tokio::test]
    async fn test_staged_upload_written_and_removed_on_drop() {
        let dir = tempdir().unwrap();

        let path = {
            let staged = StagedUpload::create(dir.path(), "photo.png", b"image bytes")
                .await
                .unwrap();
            assert!(staged.path().is_file());
            assert_eq!(std::fs::read(staged.path()).unwrap(), b"image bytes");
            staged.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_staged_upload_drop_tolerates_missing_file() {
        let dir = tempdir().unwrap();
        let staged = StagedUpload::create(dir.path(), "photo.png", b"bytes").await.unwrap();

        // Something else removed the file first (the documented collision race)
        std::fs::remove_file(staged.path()).unwrap();
        drop(staged);
    }
}
