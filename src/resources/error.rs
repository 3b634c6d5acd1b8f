//! Typed error variants for resource checks and applies.
//!
//! Resource code returns these directly; callers convert to
//! [`anyhow::Error`] via `?`.

use thiserror::Error;

/// Errors that arise from resource checks and apply operations.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// A command invoked by a resource failed.
    #[error("'{command}' failed: {reason}")]
    ExecutionFailed {
        /// The command line that was run.
        command: String,
        /// Error reported by the executor.
        reason: String,
    },

    /// A file, directory or binary that should exist does not.
    #[error("resource not found: {resource}")]
    NotFound {
        /// Description of the missing resource.
        resource: String,
    },

    /// A resource exists but cannot be brought to the desired state.
    #[error("invalid state for '{resource}': {reason}")]
    InvalidState {
        /// Name or path of the resource.
        resource: String,
        /// Why it cannot be changed.
        reason: String,
    },
}

impl ResourceError {
    /// Shorthand for [`ResourceError::NotFound`].
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for [`ResourceError::ExecutionFailed`] from any displayable error.
    pub fn execution(command: impl Into<String>, reason: &impl std::fmt::Display) -> Self {
        Self::ExecutionFailed {
            command: command.into(),
            reason: format!("{reason:#}"),
        }
    }
}
