//! Decoding and encoding of length-prefixed extraction responses
//!
//! Decoding validates the whole layout against the buffer bounds before
//! anything is sliced, so a truncated capture is reported rather than
//! silently shortened.

use std::io::{Read, Write};

use tracing::debug;

use crate::header::ResponseHeader;
use crate::{FrameError, FrameResult, LENGTH_PREFIX_SIZE};

/// Largest header an i32 length prefix can describe.
const MAX_HEADER_SIZE: usize = 2_147_483_647;

/// Borrowed view of a decoded response.
///
/// Produced by [`decode`]; both parts point into the caller's buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseFrame<'a> {
    header: &'a str,
    payload: &'a [u8],
}

impl<'a> ResponseFrame<'a> {
    /// The ASCII header text.
    #[must_use]
    pub const fn header(&self) -> &'a str {
        self.header
    }

    /// The opaque payload following the header.
    #[must_use]
    pub const fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// At most `max_bytes` leading bytes of the payload.
    #[must_use]
    pub fn preview(&self, max_bytes: usize) -> &'a [u8] {
        let end = max_bytes.min(self.payload.len());
        self.payload.get(..end).unwrap_or(self.payload)
    }

    /// Parse the header text as a JSON header document.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::HeaderParse` if the header is not a recognised
    /// header document.
    pub fn parse_header(&self) -> FrameResult<ResponseHeader> {
        ResponseHeader::parse(self.header)
    }

    /// Copy the frame into an owned response.
    #[must_use]
    pub fn to_owned_response(&self) -> ExtractResponse {
        ExtractResponse::new(self.header, self.payload.to_vec())
    }
}

/// Owned decoded response.
///
/// Used where the decoded data must outlive the captured buffer, such as the
/// output of a finished extraction process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractResponse {
    header: String,
    payload: Vec<u8>,
}

impl ExtractResponse {
    /// Create a response from its parts.
    pub fn new(header: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            header: header.into(),
            payload,
        }
    }

    /// The ASCII header text.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The opaque payload following the header.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Borrow this response as a frame.
    #[must_use]
    pub fn as_frame(&self) -> ResponseFrame<'_> {
        ResponseFrame {
            header: &self.header,
            payload: &self.payload,
        }
    }

    /// At most `max_bytes` leading bytes of the payload.
    #[must_use]
    pub fn preview(&self, max_bytes: usize) -> &[u8] {
        self.as_frame().preview(max_bytes)
    }

    /// Parse the header text as a JSON header document.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::HeaderParse` if the header is not a recognised
    /// header document.
    pub fn parse_header(&self) -> FrameResult<ResponseHeader> {
        ResponseHeader::parse(&self.header)
    }

    /// Re-encode into the exact bytes the executable produced.
    ///
    /// # Errors
    ///
    /// Fails only if the header was constructed by hand and is not ASCII or
    /// is longer than an i32 prefix can describe.
    pub fn to_bytes(&self) -> FrameResult<Vec<u8>> {
        encode(&self.header, &self.payload)
    }

    /// Split into header and payload.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.header, self.payload)
    }
}

/// Decode a captured response.
///
/// # Preconditions
/// - `buffer` holds the complete stdout of one extraction run
///
/// # Postconditions
/// - Returns the header (exactly the declared number of bytes) and the
///   remaining bytes as payload
/// - Returns Err(FrameError::MalformedResponse) if the buffer is shorter than
///   the prefix, the prefix is negative, or the header would run past the end
/// - Returns Err(FrameError::Encoding) if a header byte is not ASCII
///
/// # Errors
///
/// See postconditions.
pub fn decode(buffer: &[u8]) -> FrameResult<ResponseFrame<'_>> {
    // Step 1: Split off the 4-byte length prefix
    let (prefix, rest) = buffer
        .split_first_chunk::<LENGTH_PREFIX_SIZE>()
        .ok_or_else(|| {
            FrameError::malformed(0, buffer.len(), "buffer shorter than length prefix")
        })?;

    // Step 2: Validate the declared length
    let declared = i32::from_le_bytes(*prefix);
    let header_len = usize::try_from(declared).map_err(|_| {
        FrameError::malformed(i64::from(declared), rest.len(), "negative header length")
    })?;

    // Step 3: Split header from payload, bounds checked
    let (header_bytes, payload) = rest.split_at_checked(header_len).ok_or_else(|| {
        FrameError::malformed(
            i64::from(declared),
            rest.len(),
            "header extends past end of buffer",
        )
    })?;

    // Step 4: Header must be ASCII
    let header = ascii_str(header_bytes)?;

    Ok(ResponseFrame { header, payload })
}

/// Encode a header and payload into a single response frame.
///
/// # Errors
///
/// Returns `FrameError::Encoding` for non-ASCII headers and
/// `FrameError::HeaderTooLarge` for headers longer than `i32::MAX` bytes.
pub fn encode(header: &str, payload: &[u8]) -> FrameResult<Vec<u8>> {
    let prefix = length_prefix(header)?;

    let capacity = LENGTH_PREFIX_SIZE
        .saturating_add(header.len())
        .saturating_add(payload.len());
    let mut buffer = Vec::with_capacity(capacity);
    buffer.extend_from_slice(&prefix);
    buffer.extend_from_slice(header.as_bytes());
    buffer.extend_from_slice(payload);

    Ok(buffer)
}

/// Write a response frame to `writer` and flush it.
///
/// # Errors
///
/// Same validation errors as [`encode`], plus `FrameError::WriteFailed` when
/// the writer fails.
pub fn write_frame<W: Write>(writer: &mut W, header: &str, payload: &[u8]) -> FrameResult<()> {
    let prefix = length_prefix(header)?;

    writer
        .write_all(&prefix)
        .map_err(|e| FrameError::write_failed(&e))?;
    writer
        .write_all(header.as_bytes())
        .map_err(|e| FrameError::write_failed(&e))?;
    writer
        .write_all(payload)
        .map_err(|e| FrameError::write_failed(&e))?;
    writer.flush().map_err(|e| FrameError::write_failed(&e))?;

    Ok(())
}

/// Buffer a whole stream and decode it.
///
/// There is no partial-read handling: the reader is drained to EOF first.
///
/// # Errors
///
/// Returns `FrameError::ReadFailed` on I/O failure, otherwise the errors of
/// [`decode`].
pub fn read_response<R: Read>(mut reader: R) -> FrameResult<ExtractResponse> {
    let mut buffer = Vec::new();
    reader
        .read_to_end(&mut buffer)
        .map_err(|e| FrameError::read_failed(&e))?;

    debug!(bytes = buffer.len(), "Buffered captured response");

    decode(&buffer).map(|frame| frame.to_owned_response())
}

fn length_prefix(header: &str) -> FrameResult<[u8; LENGTH_PREFIX_SIZE]> {
    ascii_str(header.as_bytes())?;

    let len = i32::try_from(header.len())
        .map_err(|_| FrameError::header_too_large(header.len(), MAX_HEADER_SIZE))?;

    Ok(len.to_le_bytes())
}

fn ascii_str(bytes: &[u8]) -> FrameResult<&str> {
    if let Some((offset, &byte)) = bytes.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
        return Err(FrameError::encoding(offset, byte));
    }

    // ASCII is a subset of UTF-8, so this only fails if the check above is wrong.
    std::str::from_utf8(bytes).map_err(|e| FrameError::encoding(e.valid_up_to(), 0))
}
