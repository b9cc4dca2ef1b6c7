use std::path::PathBuf;

/// Core error type for hostwatch.
///
/// Adapter crates should map their specific errors into this type so the
/// monitor can report failures consistently (chat notification vs. fatal).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("invalid host: {0:?}")]
    InvalidHost(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
