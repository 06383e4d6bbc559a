use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures of the storage layer and the drawing surface.
///
/// Storage errors never reach the player: the loaders in `settings` and
/// `highscores` log them and fall back to defaults.
#[derive(Debug, Error)]
pub enum Error {
    /// No storage backend is reachable (private browsing, no window, ...).
    #[error("storage unavailable")]
    StorageUnavailable,

    /// The backend rejected a read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// Stored JSON could not be parsed or produced.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// A stored scalar did not parse.
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// The canvas or its 2D context could not be obtained.
    #[error("render surface error: {0}")]
    Render(String),
}
