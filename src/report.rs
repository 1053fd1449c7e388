//! Console report for a decoded response.
//!
//! The report goes to stdout: the header text on one line, then a preview of
//! the payload as a byte-string literal in Python `bytes` repr form
//! (`b'...'`). Diagnostics about the
//! header contents go through `tracing` so they land on stderr.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

use std::io::{self, Write};

use potree_frame::ResponseFrame;
use tracing::{debug, info, warn};

/// Write the header text and the first `preview_bytes` payload bytes.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write_report<W: Write>(
    out: &mut W,
    frame: &ResponseFrame<'_>,
    preview_bytes: usize,
) -> io::Result<()> {
    writeln!(out, "{}", frame.header())?;
    writeln!(out, "{}", bytes_literal(frame.preview(preview_bytes)))?;
    out.flush()
}

/// Render bytes the way Python's `repr(bytes)` does.
///
/// Single quotes unless the bytes contain `'` and no `"`; `\t`, `\n`, `\r`
/// and the active quote and backslash are escaped; other bytes outside
/// printable ASCII become `\xNN`.
#[must_use]
pub fn bytes_literal(bytes: &[u8]) -> String {
    let quote = if bytes.contains(&b'\'') && !bytes.contains(&b'"') {
        '"'
    } else {
        '\''
    };

    let mut out = String::with_capacity(bytes.len().saturating_add(3));
    out.push('b');
    out.push(quote);
    for &byte in bytes {
        match byte {
            b'\t' => out.push_str("\\t"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\\' => out.push_str("\\\\"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7e => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\x{byte:02x}")),
        }
    }
    out.push(quote);
    out
}

/// Log a one-line summary of the header, if it is a header document.
///
/// A payload whose size disagrees with `points * bytesPerPoint` is logged as
/// a warning; the payload itself is left untouched.
pub fn log_summary(frame: &ResponseFrame<'_>) {
    let header = match frame.parse_header() {
        Ok(header) => header,
        Err(e) => {
            debug!(error = %e, "Header is not a header document, skipping summary");
            return;
        }
    };

    info!(
        points = header.points,
        nodes_processed = header.nodes_processed,
        bytes_per_point = header.bytes_per_point,
        duration_ms = header.duration_ms,
        "Extraction summary"
    );

    let actual = u64::try_from(frame.payload().len()).ok();
    let expected = header.expected_payload_len();
    if expected != actual {
        warn!(
            expected = ?expected,
            actual = frame.payload().len(),
            "Payload size does not match points * bytesPerPoint"
        );
    }
}
