//! Potree Invoke - run the point-cloud extraction executable
//!
//! Builds the executable's argument list from an [`ExtractConfig`], runs it
//! once, and decodes its stdout with [`potree_frame`].
//!
//! # Example
//!
//! ```no_run
//! use potree_invoke::{ConfigLayer, invoke};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigLayer::from_env()?
//!     .merge(ConfigLayer::from_file("extract.toml".as_ref())?)
//!     .build()?;
//!
//! let response = invoke(&config)?;
//! println!("{}", response.header());
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod config;
pub mod error;
pub mod process;
pub mod region;

pub use config::{ConfigLayer, DEFAULT_EXECUTABLE, DEFAULT_MAX_LEVEL, ExtractConfig};
pub use error::{InvokeError, Result};
pub use process::{CapturedOutput, build_args, invoke, resolve_executable, run_captured};
pub use region::{Region, Vertex};
