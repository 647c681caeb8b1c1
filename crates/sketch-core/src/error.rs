//! Error types for the sketch classification service.

use thiserror::Error;

/// Main error type for the sketch classification project.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decoding or processing error
    #[error("Image error: {0}")]
    Image(String),

    /// Model construction or weight loading error
    #[error("Model error: {0}")]
    Model(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Label table error
    #[error("Label error: {0}")]
    Labels(String),

    /// Inference error
    #[error("Inference error: {0}")]
    Inference(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Whether this failure was caused by the caller's input rather than
    /// the service itself. Drives the HTTP 4xx/5xx split at the endpoint.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Image(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

/// Specialized Result type for sketch classification operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Model("weights not found".to_string());
        assert_eq!(err.to_string(), "Model error: weights not found");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::Image("bad png".to_string()).is_client_error());
        assert!(!Error::Model("shape mismatch".to_string()).is_client_error());
        assert!(!Error::Inference("device".to_string()).is_client_error());
    }

    #[test]
    fn test_result_type() {
        let success: Result<i32> = Ok(42);
        assert!(success.is_ok());

        let failure: Result<i32> = Err(Error::Labels("empty".to_string()));
        assert!(failure.is_err());
    }
}
