//! Error types for scanhub.
//!
//! All fallible operations in this crate return [`Result`], which uses
//! [`ScanHubError`]. The conventions:
//!
//! - Use `thiserror` for automatic `Error` trait implementation
//! - Preserve error chains with `#[source]` attributes
//! - Include context in error messages (filenames, config values, etc.)
//!
//! System errors (`Io`) always bubble up unchanged; application errors
//! (`Validation`, `ImageProcessing`, `Decode`, `Ocr`) are wrapped with
//! context at the point where they occur.

use thiserror::Error;

/// Result type alias using `ScanHubError`.
pub type Result<T> = std::result::Result<T, ScanHubError>;

/// Main error type for all scanhub operations.
///
/// # Variants
///
/// - `Io` - File system and I/O errors (always bubble up)
/// - `Validation` - Input validation errors (missing file, bad extension, bad config)
/// - `ImageProcessing` - Image decode/conversion errors (corrupt uploads)
/// - `Decode` - Barcode/QR symbol decoding errors from the vision collaborator
/// - `Ocr` - Text recognition errors from the OCR collaborator
/// - `Serialization` - JSON serialization errors
/// - `Other` - Catch-all for uncommon errors
#[derive(Debug, Error)]
pub enum ScanHubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Decode error: {message}")]
    Decode {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ScanHubError {
    fn from(err: serde_json::Error) -> Self {
        ScanHubError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $with_source:ident, $variant:ident) => {
        #[doc = concat!("Create a ", stringify!($variant), " error")]
        pub fn $name<S: Into<String>>(message: S) -> Self {
            Self::$variant {
                message: message.into(),
                source: None,
            }
        }

        #[doc = concat!("Create a ", stringify!($variant), " error with source")]
        pub fn $with_source<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
            message: S,
            source: E,
        ) -> Self {
            Self::$variant {
                message: message.into(),
                source: Some(Box::new(source)),
            }
        }
    };
}

impl ScanHubError {
    error_constructor!(validation, validation_with_source, Validation);
    error_constructor!(image_processing, image_processing_with_source, ImageProcessing);
    error_constructor!(decode, decode_with_source, Decode);
    error_constructor!(ocr, ocr_with_source, Ocr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ScanHubError = io_err.into();
        assert!(matches!(err, ScanHubError::Io(_)));
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_validation_error() {
        let err = ScanHubError::validation("invalid input");
        assert_eq!(err.to_string(), "Validation error: invalid input");
    }

    #[test]
    fn test_validation_error_with_source() {
        let source = std::io::Error::new(std::io::ErrorKind::InvalidInput, "bad param");
        let err = ScanHubError::validation_with_source("invalid input", source);
        assert_eq!(err.to_string(), "Validation error: invalid input");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_image_processing_error() {
        let err = ScanHubError::image_processing("failed to decode image");
        assert_eq!(err.to_string(), "Image processing error: failed to decode image");
    }

    #[test]
    fn test_decode_error() {
        let err = ScanHubError::decode("symbol detection failed");
        assert_eq!(err.to_string(), "Decode error: symbol detection failed");
    }

    #[test]
    fn test_ocr_error_with_source() {
        let source = std::io::Error::other("tesseract failed");
        let err = ScanHubError::ocr_with_source("OCR failed", source);
        assert_eq!(err.to_string(), "OCR error: OCR failed");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ScanHubError = json_err.into();
        assert!(matches!(err, ScanHubError::Serialization { .. }));
        assert!(err.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_other_error() {
        let err = ScanHubError::Other("unexpected error".to_string());
        assert_eq!(err.to_string(), "unexpected error");
    }

    #[test]
    fn test_io_error_bubbles_unchanged() {
        fn read_file() -> Result<String> {
            let content = std::fs::read_to_string("/nonexistent/file.txt")?;
            Ok(content)
        }

        let result = read_file();
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ScanHubError::Io(_)));
    }
}
