use thiserror::Error;

/// User-facing errors.
#[derive(Error, Debug)]
pub enum QlexError {
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("qlex lex error at position {position}: {message}")]
    Lex { position: usize, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QlexError>;
