//! Maps request paths to files beneath the document root.
//!
//! Confinement is checked lexically before the filesystem is touched:
//! the request path is split into segments, `.` and empty segments are
//! dropped, and any `..` segment rejects the request outright.

use std::path::{Path, PathBuf};

use tokio::fs::File;

use crate::config::StaticFilesConfig;
use crate::http::mime::content_type_for;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveError {
    /// Path does not start with '/'
    NotAbsolute,
    /// Path contains a parent-directory or NUL segment
    Traversal,
    /// Nothing exists at the resolved location, or it could not be opened
    NotFound,
    /// The resolved location is a directory or other non-regular file
    NotAFile,
}

/// An opened regular file ready to be streamed.
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub file: File,
    pub len: u64,
    pub content_type: &'static str,
}

/// Joins a request path onto `root` without touching the filesystem.
///
/// "/" is replaced by `/{index}`.
pub fn confine(root: &Path, request_path: &str, index: &str) -> Result<PathBuf, ResolveError> {
    let rest = request_path
        .strip_prefix('/')
        .ok_or(ResolveError::NotAbsolute)?;

    let mut resolved = root.to_path_buf();

    if rest.is_empty() {
        resolved.push(index);
        return Ok(resolved);
    }

    for segment in rest.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(ResolveError::Traversal),
            s if s.contains('\0') => return Err(ResolveError::Traversal),
            s => resolved.push(s),
        }
    }

    Ok(resolved)
}

/// Resolves and opens the file for `request_path`.
///
/// Only regular files are served; the length comes from the opened handle.
pub async fn resolve(
    cfg: &StaticFilesConfig,
    request_path: &str,
) -> Result<ResolvedFile, ResolveError> {
    let path = confine(&cfg.root, request_path, &cfg.index)?;

    let file = File::open(&path)
        .await
        .map_err(|_| ResolveError::NotFound)?;
    let meta = file.metadata().await.map_err(|_| ResolveError::NotFound)?;

    if !meta.is_file() {
        return Err(ResolveError::NotAFile);
    }

    Ok(ResolvedFile {
        content_type: content_type_for(&path),
        len: meta.len(),
        path,
        file,
    })
}
