use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_one};
use crate::report::InstallResult;
use crate::resources::shell::DefaultShellResource;

/// Configure the default shell to zsh.
#[derive(Debug)]
pub struct ConfigureShell;

impl Task for ConfigureShell {
    fn name(&self) -> &'static str {
        "Configure default shell"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        // chsh prompts for a password, which CI cannot answer
        let is_ci = std::env::var_os("CI").is_some();
        ctx.executor.which("zsh") && !is_ci
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let resource = DefaultShellResource::new(
            "zsh".to_string(),
            std::env::var("USER").ok(),
            std::env::var("SHELL").ok(),
            ctx.executor.as_ref(),
        );
        Ok(
            match process_one(ctx, &resource, &ProcessOpts::lenient("change login shell"))? {
                InstallResult::AlreadyPresent => {
                    TaskResult::Skipped("login shell is already zsh".to_string())
                }
                InstallResult::Installed { .. } => {
                    ctx.log
                        .info("login shell changed; takes effect at next login");
                    TaskResult::Ok
                }
                InstallResult::SkippedOptionalFailure { reason }
                | InstallResult::FatalFailure { reason } => TaskResult::Partial(reason),
            },
        )
    }
}

#[cfg(test)]
#[allow(unsafe_code)] // set_var/remove_var require unsafe since Rust 1.83
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;
    use std::path::Path;

    /// Serializes tests that mutate `CI`.
    static CI_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn with_ci<T>(value: Option<&str>, f: impl FnOnce() -> T) -> T {
        let _guard = CI_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let saved = std::env::var_os("CI");
        // SAFETY: test-only env var mutation; serialized via CI_MUTEX.
        unsafe {
            match value {
                Some(v) => std::env::set_var("CI", v),
                None => std::env::remove_var("CI"),
            }
        }
        let out = f();
        unsafe {
            match saved {
                Some(v) => std::env::set_var("CI", v),
                None => std::env::remove_var("CI"),
            }
        }
        out
    }

    #[test]
    fn should_run_false_when_zsh_not_found() {
        let ctx = make_context(Path::new("/home/test"), MockExecutor::succeeding());
        assert!(!with_ci(None, || ConfigureShell.should_run(&ctx)));
    }

    #[test]
    fn should_run_false_in_ci() {
        let ctx = make_context(
            Path::new("/home/test"),
            MockExecutor::succeeding().with_binary("zsh"),
        );
        assert!(!with_ci(Some("true"), || ConfigureShell.should_run(&ctx)));
    }

    #[test]
    fn should_run_true_outside_ci_with_zsh() {
        let ctx = make_context(
            Path::new("/home/test"),
            MockExecutor::succeeding().with_binary("zsh"),
        );
        assert!(with_ci(None, || ConfigureShell.should_run(&ctx)));
    }

    #[test]
    fn chsh_failure_is_recoverable() {
        // getent and chsh both fail
        let ctx = make_context(
            Path::new("/home/test"),
            MockExecutor::fail().with_binary("zsh"),
        );
        let result = ConfigureShell.run(&ctx);
        assert!(result.is_ok());
    }
}
