//! Error types for unpage library.

use std::io;
use thiserror::Error;

/// Result type alias for unpage operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading archives and exporting records.
///
/// Only [`Error::Archive`] and [`Error::InvalidWindow`] abort a whole run;
/// everything scoped to one document, page or record is logged, tallied and
/// skipped by the walker and the exporters.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a readable ZIP container.
    #[error("Unreadable archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// No configured encoding could decode an archive entry.
    #[error("Could not decode {0} with any supported encoding")]
    Undecodable(String),

    /// The document is not well-formed XML.
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] roxmltree::Error),

    /// The document has no PAGE root in the supported namespace.
    #[error("Not a PAGE document: no Page element in the supported namespace")]
    NotAPage,

    /// No archive entry matches the page's image filename.
    #[error("Image not found in archive: {0}")]
    MissingImage(String),

    /// The image entry exists but could not be decoded.
    #[error("Error loading image {path}: {source}")]
    ImageDecode {
        /// Archive path of the image
        path: String,
        /// Decoder error
        #[source]
        source: image::ImageError,
    },

    /// A record image could not be encoded while persisting a dataset.
    #[error("Error writing image {path}: {source}")]
    ImageWrite {
        /// Output path of the image
        path: String,
        /// Encoder error
        #[source]
        source: image::ImageError,
    },

    /// The requested crop is empty after clipping to the image.
    #[error("Invalid crop: {0}")]
    InvalidCrop(String),

    /// Window size and overlap are inconsistent.
    #[error("Invalid window configuration: {0}")]
    InvalidWindow(String),

    /// Unknown export mode name.
    #[error("Invalid export mode: {0}. Available modes: {1}")]
    InvalidMode(String, String),

    /// Train fraction outside (0, 1).
    #[error("Invalid train split {0}: must be between 0 and 1")]
    InvalidSplit(f64),

    /// JSON serialization failed while persisting a dataset.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset could not be published.
    #[error("Publish error: {0}")]
    Publish(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts a whole run instead of skipping one item.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Archive(_) | Error::InvalidWindow(_) | Error::InvalidMode(..)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotAPage;
        assert_eq!(
            err.to_string(),
            "Not a PAGE document: no Page element in the supported namespace"
        );

        let err = Error::InvalidMode("csv".into(), "text, line".into());
        assert_eq!(
            err.to_string(),
            "Invalid export mode: csv. Available modes: text, line"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_fatal_classes() {
        assert!(Error::InvalidWindow("overlap".into()).is_fatal());
        assert!(Error::Archive(zip::result::ZipError::FileNotFound).is_fatal());
        assert!(!Error::MissingImage("a.jpg".into()).is_fatal());
        assert!(!Error::Undecodable("p/page/a.xml".into()).is_fatal());
    }
}
