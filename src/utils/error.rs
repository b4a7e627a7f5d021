use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackofficeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Storage error: {message}")]
    StorageError { message: String },

    #[error("Form error: {message}")]
    FormError { message: String },

    #[error("Template error: {message}")]
    TemplateError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },
}

impl BackofficeError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 給終端使用者看的訊息，不洩漏內部細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NotFound { .. } => "The requested record could not be found.".to_string(),
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. }
            | Self::TomlError(_) => format!("Configuration problem: {}", self),
            Self::FormError { message } => message.clone(),
            _ => "Something went wrong while processing the request.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BackofficeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = BackofficeError::not_found("revenue", "r-1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Record not found: revenue/r-1");
        assert_eq!(
            err.user_friendly_message(),
            "The requested record could not be found."
        );
    }

    #[test]
    fn test_storage_error_hides_details() {
        let err = BackofficeError::storage("disk on fire");
        assert!(!err.is_not_found());
        assert!(!err.user_friendly_message().contains("disk"));
    }
}
