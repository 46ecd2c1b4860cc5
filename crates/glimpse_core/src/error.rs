//! Application error types

use thiserror::Error;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Recoverable Errors (notify user, continue) =====
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Collection already exists: {0}")]
    CollectionExists(String),

    #[error("Image decode error: {0}")]
    ImageDecode(String),

    // ===== Fatal Errors (application termination) =====
    #[error("Storage error: {0}")]
    Store(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Is this error recoverable?
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::CollectionNotFound(_)
                | AppError::CollectionExists(_)
                | AppError::ImageDecode(_)
        )
    }

    /// Is this a fatal error?
    pub fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Get a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AppError::CollectionNotFound(name) => format!("Collection not found: {}", name),
            AppError::CollectionExists(name) => {
                format!("A collection named '{}' already exists.", name)
            }
            AppError::ImageDecode(msg) => format!("Cannot load image: {}", msg),
            _ => self.to_string(),
        }
    }
}

impl From<glimpse_store::StoreError> for AppError {
    fn from(e: glimpse_store::StoreError) -> Self {
        match e {
            glimpse_store::StoreError::NotFound(name) => AppError::CollectionNotFound(name),
            glimpse_store::StoreError::AlreadyExists(name) => AppError::CollectionExists(name),
            glimpse_store::StoreError::Io(e) => AppError::Io(e),
            _ => AppError::Store(e.to_string()),
        }
    }
}

impl From<image::ImageError> for AppError {
    fn from(e: image::ImageError) -> Self {
        AppError::ImageDecode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_lift_to_lookup_variants() {
        let e: AppError = glimpse_store::StoreError::NotFound("X".into()).into();
        assert!(matches!(e, AppError::CollectionNotFound(_)));
        assert!(e.is_recoverable());

        let e: AppError = glimpse_store::StoreError::AlreadyExists("X".into()).into();
        assert!(matches!(e, AppError::CollectionExists(_)));
        assert!(e.user_message().contains("already exists"));
    }

    #[test]
    fn test_storage_failure_is_fatal() {
        let e: AppError = glimpse_store::StoreError::Pool("gone".into()).into();
        assert!(e.is_fatal());
    }
}
