use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure a single user action can end in.
///
/// None of these are retried. Preprocessing and inference errors are
/// reported for the action that caused them and never reach the store.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("unsupported upload '{file_name}': expected a non-empty .jpg, .jpeg or .png file")]
    UnsupportedUpload { file_name: String },

    #[error("model unavailable at {path:?}: {reason}")]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("patient store at {path:?} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("index {index} is out of range for a store of {len} records")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid patient record: {0}")]
    InvalidRecord(String),

    #[error("not authenticated")]
    NotAuthenticated,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
