//! Errors reported by the reorder coordinator.

/// Error types for reorder operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReorderError {
    /// A drag-move or drag-end arrived for a column missing from the position
    /// snapshot. Drag-start must precede them within one gesture.
    UnknownColumn(String),
    /// The coordinator has not been started (or was stopped).
    NotStarted,
    /// `start()` was called on a running coordinator.
    AlreadyStarted,
}

impl std::fmt::Display for ReorderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReorderError::UnknownColumn(prop) => {
                write!(f, "Column '{}' has no drag-start snapshot", prop)
            }
            ReorderError::NotStarted => write!(f, "Reorder coordinator is not started"),
            ReorderError::AlreadyStarted => write!(f, "Reorder coordinator is already started"),
        }
    }
}

impl std::error::Error for ReorderError {}

/// Result type for reorder operations.
pub type ReorderResult<T> = Result<T, ReorderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(
            ReorderError::UnknownColumn("age".into()).to_string(),
            "Column 'age' has no drag-start snapshot"
        );
        assert_eq!(
            ReorderError::NotStarted.to_string(),
            "Reorder coordinator is not started"
        );
    }
}
