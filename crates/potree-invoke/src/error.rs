//! Error types for invoking the extraction executable.

use std::path::PathBuf;

use potree_frame::FrameError;
use thiserror::Error;

/// Result type for invocation operations.
pub type Result<T> = std::result::Result<T, InvokeError>;

/// Errors that can occur while configuring or running an extraction.
///
/// None of these are retried; each one ends the run.
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Configuration values are missing or out of range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// Region coordinate string could not be parsed.
    #[error("invalid region '{input}': {reason}")]
    InvalidRegion { input: String, reason: String },

    /// Configuration file could not be read or parsed.
    #[error("failed to load config '{path}': {reason}")]
    ConfigFile { path: PathBuf, reason: String },

    /// Executable could not be located.
    #[error("executable '{executable}' not found: {reason}")]
    ExecutableNotFound { executable: PathBuf, reason: String },

    /// Executable was found but could not be started.
    #[error("failed to spawn '{executable}': {reason}")]
    Spawn { executable: PathBuf, reason: String },

    /// Executable ran and reported failure.
    #[error("extraction exited with {}: {stderr}", describe_exit(*exit_code))]
    ProcessInvocation {
        /// Exit code, `None` if the process was terminated by a signal
        exit_code: Option<i32>,
        /// Captured standard error, lossily decoded
        stderr: String,
    },

    /// Captured output does not follow the response framing.
    #[error("invalid extraction output: {0}")]
    Frame(#[from] FrameError),
}

impl InvokeError {
    /// Create an invalid configuration error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create an invalid region error.
    pub fn invalid_region(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidRegion {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a config file error.
    pub fn config_file(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ConfigFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an executable not found error.
    pub fn executable_not_found(executable: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ExecutableNotFound {
            executable: executable.into(),
            reason: reason.into(),
        }
    }

    /// Create a spawn error.
    pub fn spawn(executable: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Spawn {
            executable: executable.into(),
            reason: reason.into(),
        }
    }

    /// Create a process invocation error.
    pub fn process_invocation(exit_code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ProcessInvocation {
            exit_code,
            stderr: stderr.into(),
        }
    }
}

fn describe_exit(exit_code: Option<i32>) -> String {
    exit_code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |code| format!("exit code {code}"),
    )
}
