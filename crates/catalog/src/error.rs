use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors raised while loading or validating a catalog.
#[derive(Debug)]
pub enum CatalogError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Json(serde_json::Error),
    DuplicateVideoId(String),
    DuplicateAuthorId(String),
    DuplicateCategoryId(String),
    InvalidBudget {
        video_id: String,
        min: u64,
        max: u64,
    },
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read catalog {} ({source})", path.display())
            }
            Self::Json(err) => write!(f, "catalog json is invalid: {err}"),
            Self::DuplicateVideoId(id) => write!(f, "duplicate video id: {id}"),
            Self::DuplicateAuthorId(id) => write!(f, "duplicate author id: {id}"),
            Self::DuplicateCategoryId(id) => write!(f, "duplicate category id: {id}"),
            Self::InvalidBudget { video_id, min, max } => {
                write!(f, "budget range {min}..{max} is inverted for video {video_id}")
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
