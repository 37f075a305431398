use crate::domain::model::CommissionId;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DailiesError {
    #[error("Validation error on `{field}`: {reason}")]
    ValidationError { field: String, reason: String },

    #[error("Commission {id} not found")]
    NotFoundError { id: CommissionId },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Storage file {} is corrupt: {reason}", .path.display())]
    CorruptStorageError { path: PathBuf, reason: String },

    #[error("Database error: {message}")]
    DatabaseError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for `{field}` ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Notification failed: {message}")]
    NotificationError { message: String },
}

pub type Result<T> = std::result::Result<T, DailiesError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Storage,
    Configuration,
    Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DailiesError {
    pub fn validation(field: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } => ErrorCategory::Validation,
            Self::NotFoundError { .. } => ErrorCategory::NotFound,
            Self::IoError(_)
            | Self::StorageError { .. }
            | Self::CorruptStorageError { .. }
            | Self::DatabaseError { .. } => ErrorCategory::Storage,
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            Self::NotificationError { .. } => ErrorCategory::Notification,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotificationError { .. } => ErrorSeverity::Low,
            Self::ValidationError { .. } | Self::NotFoundError { .. } => ErrorSeverity::Medium,
            Self::CorruptStorageError { .. } => ErrorSeverity::Critical,
            _ => match self.category() {
                ErrorCategory::Configuration => ErrorSeverity::Critical,
                _ => ErrorSeverity::High,
            },
        }
    }

    /// 使用者重試同一動作是否可能成功（store 本身從不自動重試）
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::IoError(_)
                | Self::StorageError { .. }
                | Self::DatabaseError { .. }
                | Self::NotificationError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ValidationError { field, .. } => {
                format!("Correct the `{}` value and submit again", field)
            }
            Self::NotFoundError { .. } => {
                "The commission is already gone; refresh the day view".to_string()
            }
            Self::CorruptStorageError { path, .. } => format!(
                "Restore {} from a backup or move it aside to start fresh",
                path.display()
            ),
            Self::IoError(_) | Self::StorageError { .. } => {
                "Check that the data directory is writable and retry".to_string()
            }
            Self::DatabaseError { .. } => {
                "Check that the database file is not locked by another process and retry"
                    .to_string()
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Review the configuration file and command line flags".to_string()
            }
            Self::NotificationError { .. } => {
                "Notifications are optional; the action itself succeeded".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Invalid input: {}", self),
            ErrorCategory::NotFound => format!("Nothing to do: {}", self),
            ErrorCategory::Storage => format!("Could not access stored commissions: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Notification => format!("Notification skipped: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_taxonomy() {
        let err = DailiesError::validation("description", "cannot be empty");
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(!err.is_retryable());

        let err = DailiesError::NotFoundError { id: CommissionId(7) };
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert_eq!(err.to_string(), "Commission 7 not found");

        let err = DailiesError::storage("disk full");
        assert_eq!(err.category(), ErrorCategory::Storage);
        assert!(err.is_retryable());

        let err = DailiesError::CorruptStorageError {
            path: PathBuf::from("data.json"),
            reason: "expected value".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("data.json"));
    }

    #[test]
    fn test_user_friendly_message_mentions_cause() {
        let err = DailiesError::InvalidConfigValueError {
            field: "storage.path".to_string(),
            value: String::new(),
            reason: "Path cannot be empty".to_string(),
        };
        let message = err.user_friendly_message();
        assert!(message.starts_with("Configuration problem"));
        assert!(message.contains("storage.path"));
    }
}
