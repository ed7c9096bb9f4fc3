use thiserror::Error;

pub type Result<T> = std::result::Result<T, MiningError>;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("invalid threshold: {reason}")]
    InvalidThreshold { reason: String },

    #[error("transaction {index} has non-positive weight {weight}")]
    MalformedTransaction { index: usize, weight: usize },

    #[error("no support recorded for itemset {itemset}")]
    MissingSupport { itemset: String },

    #[error("malformed record on line {line}: {content:?}")]
    MalformedRecord { line: usize, content: String },

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("invalid token pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MiningError {
    pub(crate) fn invalid_threshold(reason: impl Into<String>) -> Self {
        Self::InvalidThreshold { reason: reason.into() }
    }

    pub(crate) fn missing_support<T: std::fmt::Debug>(itemset: &[T]) -> Self {
        Self::MissingSupport { itemset: format!("{itemset:?}") }
    }
}
