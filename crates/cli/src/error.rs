use std::fmt::{Display, Formatter};

/// Result type used by the feed CLI.
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors reported by `feedctl` before exiting non-zero.
#[derive(Debug)]
pub enum CliError {
    Io(std::io::Error),
    Catalog(catalog::CatalogError),
    Engine(engine::EngineError),
    UnknownVideo { video_id: String },
    BridgeClosed,
    BridgeTimeout,
}

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to write output ({err})"),
            Self::Catalog(err) => write!(f, "{err}"),
            Self::Engine(err) => write!(f, "{err}"),
            Self::UnknownVideo { video_id } => write!(f, "no video with id {video_id}"),
            Self::BridgeClosed => write!(f, "engine worker stopped unexpectedly"),
            Self::BridgeTimeout => write!(f, "timed out waiting for the engine worker"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Catalog(err) => Some(err),
            Self::Engine(err) => Some(err),
            _ => None,
        }
    }
}

impl From<catalog::CatalogError> for CliError {
    fn from(value: catalog::CatalogError) -> Self {
        Self::Catalog(value)
    }
}

impl From<engine::EngineError> for CliError {
    fn from(value: engine::EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
