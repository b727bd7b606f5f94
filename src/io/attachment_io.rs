use std::fs;
use std::path::{Path, PathBuf};

use crate::model::attachment::guess_mime;

/// Error type for reading a file the user attached
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("no such file: {}", .0.display())]
    NotFound(PathBuf),
    #[error("not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("could not read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Metadata of a picked file, available immediately
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
    pub mime: String,
}

/// Stat a file for attaching. Nothing is read beyond its metadata.
pub fn pick_file(path: &Path) -> Result<PickedFile, AttachmentError> {
    let meta = fs::metadata(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AttachmentError::NotFound(path.to_path_buf()),
        _ => AttachmentError::IoError {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !meta.is_file() {
        return Err(AttachmentError::NotAFile(path.to_path_buf()));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = guess_mime(&name).to_string();
    Ok(PickedFile {
        path: path.to_path_buf(),
        name,
        size: meta.len(),
        mime,
    })
}
