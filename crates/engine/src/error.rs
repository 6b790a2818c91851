use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SliceError>;

#[derive(Error, Debug)]
pub enum SliceError {
    #[error("AST document not found at path: {}", .0.display())]
    DocumentNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot write failed: {0}")]
    Snapshot(String),
}
