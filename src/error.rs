//! Error types for qrstudio operations

use thiserror::Error;

/// Result type alias using qrstudio's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for qrstudio operations
#[derive(Error, Debug)]
pub enum Error {
    /// QR code encoding failed (content too long for any version, etc.)
    #[error("Failed to encode QR code: {0}")]
    QrEncode(String),

    /// A colour string could not be parsed at render time
    #[error("Invalid colour '{value}': {reason}")]
    InvalidColor {
        /// The colour string as supplied
        value: String,
        /// Parser message
        reason: String,
    },

    /// Logo data could not be decoded
    #[error("Invalid logo image: {0}")]
    InvalidLogo(String),

    /// Logo file exceeds the upload limit
    #[error("Logo is {size} bytes, limit is {limit} bytes")]
    LogoTooLarge {
        /// Size of the rejected file in bytes
        size: u64,
        /// Configured limit in bytes
        limit: u64,
    },

    /// An operation needed the engine before `mount` created it
    #[error("Rendering engine has not been mounted")]
    EngineNotMounted,

    /// Export / download failed
    #[error("Export failed: {0}")]
    Export(String),

    /// Studio command could not be parsed
    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Image processing error
    #[error("Image processing error: {0}")]
    Image(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}

impl From<qrcode::types::QrError> for Error {
    fn from(e: qrcode::types::QrError) -> Self {
        Error::QrEncode(e.to_string())
    }
}

impl From<base64::DecodeError> for Error {
    fn from(e: base64::DecodeError) -> Self {
        Error::InvalidLogo(format!("base64 decode error: {}", e))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Other(format!("JSON error: {}", e))
    }
}
