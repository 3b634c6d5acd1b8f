use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;

/// A resource for configuring the default login shell.
#[derive(Debug)]
pub struct DefaultShellResource<'a> {
    /// Target shell name (e.g., "zsh").
    target_shell: String,
    /// Account whose passwd entry is consulted.
    user: Option<String>,
    /// Value of `$SHELL`, used when the passwd lookup is unavailable.
    env_shell: Option<String>,
    executor: &'a dyn Executor,
}

impl<'a> DefaultShellResource<'a> {
    /// Create a new default shell resource.
    #[must_use]
    pub const fn new(
        target_shell: String,
        user: Option<String>,
        env_shell: Option<String>,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            target_shell,
            user,
            env_shell,
            executor,
        }
    }

    /// The login shell from `getent passwd`, falling back to `$SHELL`.
    #[must_use]
    pub fn login_shell(&self) -> Option<String> {
        self.passwd_shell()
            .or_else(|| self.env_shell.clone().filter(|s| !s.is_empty()))
    }

    fn passwd_shell(&self) -> Option<String> {
        let user = self.user.as_deref()?;
        let result = self.executor.run_unchecked("getent", &["passwd", user]).ok()?;
        if !result.success {
            return None;
        }
        result
            .stdout
            .lines()
            .next()?
            .split(':')
            .nth(6)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }
}

impl Applicable for DefaultShellResource<'_> {
    fn description(&self) -> String {
        format!("default shell → {}", self.target_shell)
    }

    fn apply(&self) -> Result<ResourceChange> {
        let path = self
            .executor
            .resolve(&self.target_shell)
            .ok_or_else(|| ResourceError::not_found(&self.target_shell))?;
        let path = path.to_string_lossy();
        self.executor
            .run_interactive("chsh", &["-s", path.as_ref()])
            .map_err(|e| ResourceError::execution(format!("chsh -s {path}"), &e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for DefaultShellResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        let suffix = format!("/{}", self.target_shell);
        match self.login_shell() {
            Some(shell) if shell.ends_with(&suffix) || shell == self.target_shell => {
                Ok(ResourceState::Correct)
            }
            Some(shell) => Ok(ResourceState::Incorrect { current: shell }),
            None => Ok(ResourceState::Missing),
        }
    }
}
