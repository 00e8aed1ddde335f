//! Error type for pixel buffer construction.

use thiserror::Error;

/// Error returned when raw pixel data does not describe a valid buffer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Byte count is not `width * height * 3`
    #[error("pixel data for {width}x{height} needs {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// `width * height * 3`
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },
    /// Index count is not `width * height`
    #[error("index data for {width}x{height} needs {expected} entries, got {actual}")]
    IndexLengthMismatch {
        /// Declared width
        width: usize,
        /// Declared height
        height: usize,
        /// `width * height`
        expected: usize,
        /// Entries supplied
        actual: usize,
    },
}
