//! # potree-extract
//!
//! Client for a point-cloud region extraction tool. The tool is run as a
//! child process and writes one length-prefixed response to stdout; this
//! crate configures the run, decodes the response and prints a short report.
//!
//! The work is split across the workspace:
//!
//! - [`potree_frame`]: response framing and the header document
//! - [`potree_invoke`]: configuration, region strings and the process call
//! - [`cli`] and [`report`]: the command-line surface of the binary

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod cli;
pub mod report;

pub use potree_frame;
pub use potree_invoke;
