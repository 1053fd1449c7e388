//! Running the extraction executable
//!
//! One blocking invocation per run: the child is started with five
//! positional arguments, its stdout and stderr are buffered in full, and the
//! call returns once the child has exited. There is no timeout and no retry.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use potree_frame::{ExtractResponse, decode};
use tracing::{debug, info};

use crate::config::ExtractConfig;
use crate::error::{InvokeError, Result};

/// Everything a finished extraction process produced.
#[derive(Debug)]
pub struct CapturedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl CapturedOutput {
    /// Exit status of the child
    #[must_use]
    pub const fn status(&self) -> ExitStatus {
        self.status
    }

    /// Raw standard output, the length-prefixed response on success
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Raw standard error
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Check the exit status and decode stdout.
    ///
    /// # Errors
    ///
    /// Returns `InvokeError::ProcessInvocation` for a failed exit status and
    /// `InvokeError::Frame` when stdout is not a valid response.
    pub fn into_response(self) -> Result<ExtractResponse> {
        if !self.status.success() {
            return Err(InvokeError::process_invocation(
                self.status.code(),
                String::from_utf8_lossy(&self.stderr).trim_end(),
            ));
        }

        let frame = decode(&self.stdout)?;

        debug!(
            header_bytes = frame.header().len(),
            payload_bytes = frame.payload().len(),
            "Decoded extraction response"
        );

        Ok(frame.to_owned_response())
    }
}

/// Positional arguments for the executable, in the order it reads them:
/// input path, region, width, min level, max level.
#[must_use]
pub fn build_args(config: &ExtractConfig) -> Vec<OsString> {
    vec![
        config.input_path().as_os_str().to_os_string(),
        OsString::from(config.region().to_string()),
        OsString::from(config.width().to_string()),
        OsString::from(config.min_level().to_string()),
        OsString::from(config.max_level().to_string()),
    ]
}

/// Locate the executable.
///
/// Bare names are searched on `PATH`; anything containing a path separator
/// is checked in place.
///
/// # Errors
///
/// Returns `InvokeError::ExecutableNotFound` if no executable file exists at
/// the given location.
pub fn resolve_executable(executable: &Path) -> Result<PathBuf> {
    which::which(executable)
        .map_err(|e| InvokeError::executable_not_found(executable, e.to_string()))
}

/// Run the executable and capture its output without interpreting it.
///
/// # Errors
///
/// Returns error if:
/// - The executable cannot be located
/// - The process fails to spawn or cannot be waited on
pub fn run_captured(config: &ExtractConfig) -> Result<CapturedOutput> {
    let executable = resolve_executable(config.executable_path())?;
    let args = build_args(config);

    info!(
        executable = %executable.display(),
        input = %config.input_path().display(),
        vertices = config.region().vertices().len(),
        width = config.width(),
        min_level = config.min_level(),
        max_level = config.max_level(),
        "Starting extraction"
    );
    debug!(args = ?args, "Extraction arguments");

    let output = Command::new(&executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| InvokeError::spawn(&executable, e.to_string()))?;

    debug!(
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Extraction finished"
    );

    Ok(CapturedOutput {
        status: output.status,
        stdout: output.stdout,
        stderr: output.stderr,
    })
}

/// Run the extraction and decode its response.
///
/// # Errors
///
/// Any error from [`run_captured`] or [`CapturedOutput::into_response`].
pub fn invoke(config: &ExtractConfig) -> Result<ExtractResponse> {
    run_captured(config)?.into_response()
}
