//! Error types for the PDF generation library.
//!
//! All fallible operations in this crate return [`Result`]. Failures abort the
//! generator call that raised them; a half-built document is never returned.

/// Result type alias for PDF generation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while generating a PDF document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The supplied string is not a `data:image/jpeg;base64,<payload>` URI
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Image payload could not be decoded or re-encoded
    #[error("Image error: {0}")]
    Image(String),

    /// Pixel dimensions must both be greater than zero
    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Supplied pixel width
        width: u32,
        /// Supplied pixel height
        height: u32,
    },

    /// A reserved object slot was never filled before finalization
    #[error("Object {0} was reserved but never filled")]
    UnfilledReservation(u32),

    /// `fill_object` was called on a slot that is not a reservation
    #[error("Object {0} is not a reserved slot")]
    NotReserved(u32),

    /// A single table row wraps to more lines than any page can hold
    #[error("Table row wraps to {lines} lines but a page holds at most {max}")]
    RowTooTall {
        /// Wrapped line count of the offending row
        lines: usize,
        /// Maximum lines a fresh page can hold
        max: usize,
    },

    /// The operation was abandoned through its cancellation token
    #[error("Operation cancelled")]
    Cancelled,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_data_url_error() {
        let err = Error::InvalidDataUrl("missing base64 marker".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("Invalid data URL"));
        assert!(msg.contains("missing base64 marker"));
    }

    #[test]
    fn test_invalid_dimensions_error() {
        let err = Error::InvalidDimensions {
            width: 0,
            height: 200,
        };
        assert!(format!("{}", err).contains("0x200"));
    }

    #[test]
    fn test_row_too_tall_error() {
        let err = Error::RowTooTall {
            lines: 80,
            max: 52,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("80"));
        assert!(msg.contains("52"));
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
