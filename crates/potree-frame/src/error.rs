//! Framing errors
//!
//! Every error carries enough context to tell a truncated capture from a
//! corrupted one.

use std::io::ErrorKind as IoErrorKind;

use thiserror::Error;

/// Framing errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    /// The buffer does not conform to the length-prefixed layout.
    ///
    /// Caused by:
    /// - Fewer than 4 bytes captured
    /// - Negative length prefix
    /// - Length prefix larger than the bytes that follow it
    #[error("malformed response: {reason} (declared header {declared} bytes, {available} bytes available)")]
    MalformedResponse {
        /// Header length as declared by the prefix (0 if the prefix was missing)
        declared: i64,
        /// Bytes available after the prefix
        available: usize,
        /// What was wrong with the frame
        reason: String,
    },

    /// Header contains a byte outside the 7-bit ASCII range.
    #[error("header is not ASCII: byte 0x{byte:02x} at offset {offset}")]
    Encoding {
        /// Offset of the first offending byte, relative to the header start
        offset: usize,
        /// Value of the offending byte
        byte: u8,
    },

    /// Header is too long to be described by an i32 length prefix.
    #[error("header too large: {actual_size} bytes (max {max_size} bytes)")]
    HeaderTooLarge {
        /// Header length in bytes
        actual_size: usize,
        /// Largest encodable header
        max_size: usize,
    },

    /// Header text is not a recognised JSON header document.
    #[error("header parse failed: {cause}")]
    HeaderParse {
        /// serde_json error message
        cause: String,
    },

    /// Reading the captured response failed.
    #[error("read failed: {kind:?} (error code: {error_code:?})")]
    ReadFailed {
        /// OS error code
        error_code: Option<i32>,
        /// Error kind
        kind: IoErrorKind,
    },

    /// Writing an encoded frame failed.
    #[error("write failed: {kind:?} (error code: {error_code:?})")]
    WriteFailed {
        /// OS error code
        error_code: Option<i32>,
        /// Error kind
        kind: IoErrorKind,
    },
}

impl FrameError {
    /// Create a MalformedResponse error
    pub fn malformed(declared: i64, available: usize, reason: impl Into<String>) -> Self {
        Self::MalformedResponse {
            declared,
            available,
            reason: reason.into(),
        }
    }

    /// Create an Encoding error
    #[must_use]
    pub const fn encoding(offset: usize, byte: u8) -> Self {
        Self::Encoding { offset, byte }
    }

    /// Create a HeaderTooLarge error
    #[must_use]
    pub const fn header_too_large(actual_size: usize, max_size: usize) -> Self {
        Self::HeaderTooLarge {
            actual_size,
            max_size,
        }
    }

    /// Create a HeaderParse error
    pub fn header_parse(cause: impl Into<String>) -> Self {
        Self::HeaderParse {
            cause: cause.into(),
        }
    }

    /// Create a ReadFailed error from std::io::Error
    #[must_use]
    pub fn read_failed(err: &std::io::Error) -> Self {
        Self::ReadFailed {
            error_code: err.raw_os_error(),
            kind: err.kind(),
        }
    }

    /// Create a WriteFailed error from std::io::Error
    #[must_use]
    pub fn write_failed(err: &std::io::Error) -> Self {
        Self::WriteFailed {
            error_code: err.raw_os_error(),
            kind: err.kind(),
        }
    }

    /// True for errors caused by the shape of the captured bytes rather than I/O.
    #[must_use]
    pub const fn is_framing(&self) -> bool {
        matches!(
            self,
            Self::MalformedResponse { .. } | Self::Encoding { .. }
        )
    }
}

/// Result type for framing operations
pub type FrameResult<T> = Result<T, FrameError>;
