use std::path::PathBuf;

/// Domain errors raised while locating, loading, or driving generator scripts.
///
/// Every variant carries a human-readable message that is surfaced to the
/// HTTP caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Porchroot Auto repo not found at {}. Set PORCHROOT_AUTO_DIR to point to it.", .path.display())]
    RepositoryNotFound { path: PathBuf },

    #[error("Script missing: {}", .path.display())]
    ScriptMissing { path: PathBuf },

    #[error("Could not import {}: {reason}", .path.display())]
    ScriptLoadFailed { path: PathBuf, reason: String },

    #[error("{0}")]
    NoItemsAvailable(String),

    #[error("{0}")]
    ZeroRequested(String),

    #[error("{0}")]
    UpstreamGeneration(String),
}
