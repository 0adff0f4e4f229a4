use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands and configuration loading.
#[derive(Debug)]
pub enum EngineError {
    DetailSessionNotOpen,
    ConfigIo {
        path: PathBuf,
        source: std::io::Error,
    },
    ConfigSerialization {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidConfig {
        reason: &'static str,
    },
    Catalog(catalog::CatalogError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DetailSessionNotOpen => write!(f, "detail view is not open"),
            Self::ConfigIo { path, source } => {
                write!(f, "failed to read feed config {} ({source})", path.display())
            }
            Self::ConfigSerialization { path, source } => {
                write!(
                    f,
                    "feed config deserialization failed at {} ({source})",
                    path.display()
                )
            }
            Self::InvalidConfig { reason } => write!(f, "invalid feed config: {reason}"),
            Self::Catalog(err) => write!(f, "catalog error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo { source, .. } => Some(source),
            Self::ConfigSerialization { source, .. } => Some(source),
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<catalog::CatalogError> for EngineError {
    fn from(value: catalog::CatalogError) -> Self {
        Self::Catalog(value)
    }
}
