use thiserror::Error;

use crate::stop::StopId;

/// Failure reading or writing a persisted gradient configuration.
///
/// Loads are all-or-nothing: any of these means nothing was applied.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid gradient configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("duplicate stop id {0} in configuration")]
    DuplicateId(StopId),
}
