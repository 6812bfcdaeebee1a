//! Error types and handling.

use thiserror::Error;

/// Message shown when neither the server nor the client produced anything better.
pub const GENERIC_ERROR_MESSAGE: &str = "Não foi possível concluir a operação. Tente novamente.";

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// HTTP request failed before a response arrived
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Session token missing, expired or rejected
    #[error("Unauthorized")]
    Unauthorized,

    /// Response body could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excel export error
    #[error("Export error: {0}")]
    Export(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Record not found
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Result type alias for AppError
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    /// Create a config error with message
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error with message
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error with message
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Message suitable for an alert dialog.
    ///
    /// Server and validation messages are shown as-is; transport and decoding
    /// failures fall back to the generic message.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } if !message.trim().is_empty() => message.clone(),
            Self::Validation(msg) | Self::NotFound(msg) if !msg.trim().is_empty() => msg.clone(),
            Self::Unauthorized => "Sessão expirada. Entre novamente.".to_string(),
            _ => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }

    /// Whether the error means the user must sign in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Self::Export(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_message_is_shown() {
        let err = AppError::Api {
            status: 422,
            message: "CNPJ já cadastrado".to_string(),
        };
        assert_eq!(err.user_message(), "CNPJ já cadastrado");
    }

    #[test]
    fn test_empty_api_message_falls_back() {
        let err = AppError::Api {
            status: 500,
            message: "  ".to_string(),
        };
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_io_error_falls_back() {
        let err = AppError::Io(std::io::Error::other("disk"));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[test]
    fn test_validation_message_is_shown() {
        let err = AppError::validation("Selecione um contrato de destino");
        assert_eq!(err.user_message(), "Selecione um contrato de destino");
        assert!(!err.is_unauthorized());
        assert!(AppError::Unauthorized.is_unauthorized());
    }
}
