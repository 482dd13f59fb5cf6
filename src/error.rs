//! Error types for slide rendering and export

use thiserror::Error;

/// Result type alias for slidepress operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering, capturing or exporting slides
#[derive(Error, Debug)]
pub enum Error {
    /// The capture or document capability could not be loaded
    #[error("Export capabilities failed to load: {0}")]
    CapabilityLoad(String),

    /// No slide blocks were present on the mounted surface
    #[error("Slides not found.")]
    SlidesNotFound,

    /// Failed to render or capture content
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to encode or decode a raster image
    #[error("Image encoding failed: {0}")]
    EncodeError(String),

    /// Failed to assemble the output document
    #[error("Document assembly failed: {0}")]
    DocumentError(String),

    /// Failed to save the output document
    #[error("Failed to save document: {0}")]
    SaveError(String),

    /// A capture did not finish in time
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
}

impl From<png::EncodingError> for Error {
    fn from(err: png::EncodingError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

impl From<png::DecodingError> for Error {
    fn from(err: png::DecodingError) -> Self {
        Error::EncodeError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slides_not_found_message_matches_notice() {
        assert_eq!(Error::SlidesNotFound.to_string(), "Slides not found.");
        assert_eq!(Error::Timeout(250).to_string(), "Operation timed out after 250ms");
    }
}
