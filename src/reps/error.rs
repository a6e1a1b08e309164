use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepsError {
    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("No items tracked yet")]
    EmptyStore,

    #[error("Nothing to undo")]
    NothingToUndo,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt delta at position {index}: {reason}")]
    CorruptDelta { index: usize, reason: String },

    #[error("Cannot undo: {0}")]
    UndoConflict(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl RepsError {
    /// Expected, recoverable conditions that are reported as-is.
    /// Everything else aborted a transaction.
    pub fn is_business(&self) -> bool {
        matches!(
            self,
            RepsError::NotFound(_)
                | RepsError::EmptyStore
                | RepsError::NothingToUndo
                | RepsError::InvalidInput(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RepsError>;
