//! Upload persistence.
//!
//! Writing uploads to disk is an audit side effect only; ranking always works
//! from the in-memory bytes. Files are keyed by sanitized filename and never
//! cleaned up, and nothing serializes concurrent writers: two uploads with the
//! same sanitized name overwrite each other and the last write wins.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info};
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::errors::AppError;

#[async_trait]
pub trait ResumeArchive: Send + Sync {
    /// Stores `content` under `stored_name`, replacing any previous file of that name.
    async fn persist(&self, stored_name: &str, content: &[u8]) -> Result<(), AppError>;
}

/// Writes uploads into a single flat directory.
pub struct DiskArchive {
    dir: PathBuf,
}

impl DiskArchive {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, stored_name: &str) -> PathBuf {
        self.dir.join(stored_name)
    }
}

#[async_trait]
impl ResumeArchive for DiskArchive {
    async fn persist(&self, stored_name: &str, content: &[u8]) -> Result<(), AppError> {
        let path = self.path_for(stored_name);
        tokio::fs::write(&path, content).await?;
        debug!("Persisted {} bytes to {}", content.len(), path.display());
        Ok(())
    }
}

/// Used when `PERSIST_UPLOADS=false`.
pub struct NullArchive;

#[async_trait]
impl ResumeArchive for NullArchive {
    async fn persist(&self, _stored_name: &str, _content: &[u8]) -> Result<(), AppError> {
        Ok(())
    }
}

/// Creates the upload directory if it does not exist yet.
pub fn ensure_upload_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!("Created upload directory {}", dir.display());
    }
    Ok(())
}

/// Reduces a client-supplied filename to a safe flat name: NFKD-decomposed so
/// accented letters keep their base letter, then ASCII only, no path separators, whitespace runs collapsed to `_`, only `[A-Za-z0-9_.-]` kept, and
/// leading/trailing `.` and `_` trimmed. May return an empty string.
pub fn sanitize_filename(filename: &str) -> String {
    let ascii: String = filename
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// Sanitized storage name, falling back to a random one when nothing survives.
pub fn stored_name_for(filename: &str) -> String {
    let sanitized = sanitize_filename(filename);
    if sanitized.is_empty() {
        format!("upload-{}", Uuid::new_v4())
    } else {
        sanitized
    }
}
