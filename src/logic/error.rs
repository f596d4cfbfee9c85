use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListError {
    /// Unknown list, unknown item, or an item owned by a different list.
    /// Callers are never told which.
    #[error("not found")]
    NotFound,

    #[error("invalid item at index {index}: {reason}")]
    InvalidItem { index: usize, reason: String },

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

pub type ListResult<T> = Result<T, ListError>;
