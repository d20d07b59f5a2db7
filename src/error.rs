use thiserror::Error;

/// 库内部统一错误类型
#[derive(Debug, Error)]
pub enum SpyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode price response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write trade record: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("no edge {from} -> {to} in exchange graph")]
    MissingEdge { from: String, to: String },
}

pub type SpyResult<T> = std::result::Result<T, SpyError>;
