//! Idempotent resource primitives (check + apply pattern).
pub mod alias_link;
mod error;
pub mod font;
pub mod helpers;
pub mod installer;
pub mod package;
pub mod repository;
pub mod shell;

pub use error::ResourceError;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Bring the resource to its desired state.
    ///
    /// Implementations create parent directories as needed and report
    /// whether anything changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be made (I/O failure, failed
    /// external command, missing prerequisite).
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a resource on disk or on PATH.
///
/// # Examples
///
/// ```
/// use zsh_bootstrap::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let wrong = ResourceState::Incorrect { current: "/usr/bin/bash".into() };
/// let blocked = ResourceState::Invalid { reason: "regular file in the way".into() };
///
/// assert_ne!(missing, ResourceState::Correct);
/// assert_ne!(wrong, blocked);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource does not exist.
    Missing,
    /// Resource exists and matches the desired state.
    Correct,
    /// Resource exists but does not match the desired state.
    Incorrect {
        /// What is there now.
        current: String,
    },
    /// Resource must not be touched (e.g. a regular file where a link belongs).
    Invalid {
        /// Why it cannot be applied.
        reason: String,
    },
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created or updated.
    Applied,
    /// Resource was already correct (no change needed).
    AlreadyCorrect,
    /// Resource was left alone.
    Skipped {
        /// Why it was skipped.
        reason: String,
    },
}

/// Resources that can determine their own state before applying.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Resource::current_state`].
    fn needs_change(&self) -> Result<bool> {
        Ok(matches!(
            self.current_state()?,
            ResourceState::Missing | ResourceState::Incorrect { .. }
        ))
    }
}


#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::test_helpers::MockExecutor;
    use super::*;
    use crate::exec::Executor;

    struct TestResource {
        state: ResourceState,
    }

    impl Applicable for TestResource {
        fn description(&self) -> String {
            "test resource".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            Ok(ResourceChange::Applied)
        }
    }

    impl Resource for TestResource {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    #[test]
    fn needs_change_for_missing_resource() {
        let resource = TestResource {
            state: ResourceState::Missing,
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn needs_change_for_incorrect_resource() {
        let resource = TestResource {
            state: ResourceState::Incorrect {
                current: "wrong".to_string(),
            },
        };
        assert!(resource.needs_change().unwrap());
    }

    #[test]
    fn no_change_for_correct_or_invalid_resource() {
        for state in [
            ResourceState::Correct,
            ResourceState::Invalid {
                reason: "regular file".to_string(),
            },
        ] {
            assert!(!TestResource { state }.needs_change().unwrap());
        }
    }

    #[test]
    fn mock_provides_binary_after_success() {
        let mock = MockExecutor::succeeding().provides("bat", "batcat");
        assert!(!mock.which("batcat"));
        mock.run("apt-get", &["install", "-y", "bat"]).unwrap();
        assert!(mock.which("batcat"));
        assert_eq!(mock.calls(), vec!["apt-get install -y bat"]);
    }

    #[test]
    fn mock_failure_does_not_provide() {
        let mock = MockExecutor::fail().provides("bat", "batcat");
        assert!(mock.run("apt-get", &["install", "-y", "bat"]).is_err());
        assert!(!mock.which("batcat"));
    }
}
