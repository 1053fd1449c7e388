//! Potree Frame - Length-prefixed response framing for point-cloud extraction
//!
//! The extraction executable writes a single record to stdout. This crate
//! decodes that record into its ASCII header and opaque binary payload.
//!
//! # Protocol
//!
//! Every response consists of:
//! - **Length prefix**: 4-byte little-endian i32 indicating header size
//! - **Header**: ASCII text (in practice a JSON document)
//! - **Payload**: every remaining byte, opaque to this layer
//!
//! ```text
//! +--------+--------+--------+--------+--------------------+-------------------+
//! | Byte 0 | Byte 1 | Byte 2 | Byte 3 | Bytes 4..(4+N)     | Bytes (4+N)..     |
//! |--------+--------+--------+--------+--------------------+-------------------|
//! |      Length (little-endian i32)   |   ASCII header     |   Raw payload     |
//! |        N = header size            |   (N bytes)        |   (unbounded)     |
//! +--------+--------+--------+--------+--------------------+-------------------+
//! ```
//!
//! # Constraints
//!
//! - Negative length prefixes are rejected
//! - The declared header must fit inside the buffer
//! - Header bytes must be 7-bit ASCII
//! - Empty headers and empty payloads are both valid
//!
//! # Example
//!
//! ```rust
//! use potree_frame::decode;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let captured = b"\x05\x00\x00\x00helloWORLD";
//!
//! let frame = decode(captured)?;
//! assert_eq!(frame.header(), "hello");
//! assert_eq!(frame.payload(), b"WORLD");
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

mod error;
mod frame;
pub mod header;

pub use error::{FrameError, FrameResult};
pub use frame::{ExtractResponse, ResponseFrame, decode, encode, read_response, write_frame};
pub use header::{AttributeDescriptor, BoundingBox, ResponseHeader};

/// Length prefix size in bytes
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// Number of payload bytes shown by default when previewing a response
pub const DEFAULT_PREVIEW_BYTES: usize = 50;
