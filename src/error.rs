//! Domain-specific error types for the bootstrapper.
//!
//! Library modules return typed errors built with [`thiserror`]; task and
//! command boundaries convert them to [`anyhow::Error`] with `?`.
//!
//! # Error hierarchy
//!
//! ```text
//! BootstrapError
//! ├── Platform(PlatformError)  distribution detection
//! ├── Resource(ResourceError)  packages, links, clones, downloads
//! └── Task(TaskError)          fatal task outcomes
//! ```

use thiserror::Error;

pub use crate::resources::ResourceError;

/// Top-level error type for the bootstrapper.
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Distribution detection failed.
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// A resource could not be brought to its desired state.
    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    /// A task hit a condition that aborts the run.
    #[error("Task execution error: {0}")]
    Task(#[from] TaskError),
}

/// Errors raised while classifying the running distribution.
///
/// Both variants are produced before anything on the system is modified.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// The `os-release` file is missing or unreadable.
    #[error("cannot read {path}: {source}")]
    MissingOsRelease {
        /// Path that was read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The distribution is not on the allow-list.
    #[error("unsupported distribution '{id}'")]
    Unsupported {
        /// The `ID` value from `os-release`.
        id: String,
    },
}

/// Errors that abort the run from inside a task.
#[derive(Error, Debug)]
pub enum TaskError {
    /// A required package could not be installed under any of its names.
    #[error("required package '{package}' could not be installed: {reason}")]
    RequiredPackage {
        /// Canonical package name.
        package: String,
        /// Failure reported by the last install attempt.
        reason: String,
    },

    /// The existing `~/.zshrc` could not be backed up.
    #[error("failed to back up {path}: {source}")]
    Backup {
        /// Path of the file being backed up.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A task failed for a reason not covered above.
    #[error("Task '{task}' failed: {reason}")]
    ExecutionFailed {
        /// Name of the task that failed.
        task: String,
        /// Human-readable reason for the failure.
        reason: String,
    },
}
