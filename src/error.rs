use thiserror::Error;

/// Main error type for the Canvas-Framer library
#[derive(Error, Debug)]
pub enum CompositorError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Image processing error: {0}")]
    Image(#[from] ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path} ({reason})")]
    ParseFailed { path: String, reason: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },
}

/// Image-specific errors
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image: {path} ({reason})")]
    DecodeFailed { path: String, reason: String },

    #[error("Failed to encode image: {path} ({reason})")]
    EncodeFailed { path: String, reason: String },

    #[error("Input path is neither a file nor a directory: {path}")]
    InputNotFound { path: String },

    #[error("Invalid image dimensions: {details}")]
    InvalidDimensions { details: String },
}

/// Convenience type alias for Results using CompositorError
pub type Result<T> = std::result::Result<T, CompositorError>;

impl CompositorError {
    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Image(ImageError::DecodeFailed { path, .. }) => {
                format!(
                    "Could not read image '{}'. Please check the file is a supported format.",
                    path
                )
            }
            Self::Image(ImageError::InputNotFound { path }) => {
                format!(
                    "Input '{}' does not exist. Set `input` in the configuration to a file or directory.",
                    path
                )
            }
            _ => self.to_string(),
        }
    }
}
