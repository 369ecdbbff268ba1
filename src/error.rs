//! Error types for the engine boundary.
//!
//! Data-quality conditions (missing entities, join misses, unparsable
//! numbers, ambiguous name matches) are absorbed inside the engine and never
//! show up here. What remains is storage availability and configuration.

/// Main error type for lisdes operations
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtlasError {
    /// Storage failures are transient from the caller's point of view and
    /// should be surfaced as "try again".
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<mongodb::error::Error> for AtlasError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AtlasError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AtlasError>;

#[cfg(test)]
mod tests {
    use super::AtlasError;

    #[test]
    fn only_storage_is_retryable() {
        assert!(AtlasError::Storage("down".into()).is_retryable());
        assert!(!AtlasError::Config("bad".into()).is_retryable());
        assert_eq!(AtlasError::Storage("down".into()).to_string(), "Storage error: down");
    }
}
