use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A note or habit was submitted without a title.
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("invalid color `{0}`, expected #rrggbb")]
    InvalidColor(String),

    #[error("failed to install logger: {0}")]
    Logger(String),
}
