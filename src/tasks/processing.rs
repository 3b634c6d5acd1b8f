//! Generic resource processing loop: check state, apply, collect stats.
use anyhow::Result;

use super::context::Context;
use crate::report::InstallResult;
use crate::resources::{Resource, ResourceChange, ResourceState};

/// Result of a single task execution.
///
/// # Examples
///
/// ```
/// use zsh_bootstrap::tasks::TaskResult;
///
/// let ok = TaskResult::Ok;
/// let skipped = TaskResult::Skipped("zoxide already installed".into());
/// let partial = TaskResult::Partial("1 of 4 fonts failed".into());
///
/// assert!(matches!(ok, TaskResult::Ok));
/// assert!(matches!(skipped, TaskResult::Skipped(_)));
/// assert!(matches!(partial, TaskResult::Partial(_)));
/// ```
#[derive(Debug, Clone)]
pub enum TaskResult {
    /// Task completed successfully.
    Ok,
    /// Task had nothing to do or its tool was unavailable.
    Skipped(String),
    /// Task finished but some optional items failed.
    Partial(String),
}

/// Counters for batch tasks that process many items.
///
/// # Examples
///
/// ```
/// use zsh_bootstrap::tasks::TaskStats;
///
/// let stats = TaskStats { changed: 1, already_ok: 2, failed: 0 };
/// assert_eq!(stats.summary(), "1 changed, 2 already ok");
///
/// let stats = TaskStats { changed: 0, already_ok: 3, failed: 1 };
/// assert_eq!(stats.summary(), "0 changed, 3 already ok, 1 failed");
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskStats {
    /// Number of items changed or applied.
    pub changed: u32,
    /// Number of items already in the correct state.
    pub already_ok: u32,
    /// Number of items that could not be brought to the desired state.
    pub failed: u32,
}

impl TaskStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Format the summary string (e.g. "3 changed, 10 already ok, 1 failed").
    #[must_use]
    pub fn summary(&self) -> String {
        if self.failed > 0 {
            format!(
                "{} changed, {} already ok, {} failed",
                self.changed, self.already_ok, self.failed
            )
        } else {
            format!("{} changed, {} already ok", self.changed, self.already_ok)
        }
    }

    /// Log the summary and return the appropriate `TaskResult`.
    #[must_use]
    pub fn finish(self, ctx: &Context) -> TaskResult {
        let summary = self.summary();
        ctx.log.info(&summary);
        if self.failed > 0 {
            TaskResult::Partial(summary)
        } else {
            TaskResult::Ok
        }
    }

    /// Count one item by its reconciliation outcome.
    pub const fn count(&mut self, result: &InstallResult) {
        match result {
            InstallResult::AlreadyPresent => self.already_ok += 1,
            InstallResult::Installed { .. } => self.changed += 1,
            InstallResult::SkippedOptionalFailure { .. } | InstallResult::FatalFailure { .. } => {
                self.failed += 1;
            }
        }
    }
}

impl std::ops::AddAssign for TaskStats {
    fn add_assign(&mut self, other: Self) {
        self.changed += other.changed;
        self.already_ok += other.already_ok;
        self.failed += other.failed;
    }
}

/// How the processing loop treats failures.
///
/// # Examples
///
/// ```
/// use zsh_bootstrap::tasks::ProcessOpts;
///
/// let strict = ProcessOpts::strict("install");
/// assert!(strict.bail_on_error);
///
/// let lenient = ProcessOpts::lenient("download");
/// assert!(!lenient.bail_on_error);
/// ```
#[derive(Debug)]
pub struct ProcessOpts<'a> {
    /// Verb for log messages (e.g., "install", "clone", "download").
    pub verb: &'a str,
    /// Propagate errors from `apply()` (bail). If `false`, warn and count as failed.
    pub bail_on_error: bool,
}

impl<'a> ProcessOpts<'a> {
    /// Bail on the first error.
    #[must_use]
    pub const fn strict(verb: &'a str) -> Self {
        Self {
            verb,
            bail_on_error: true,
        }
    }

    /// Warn on errors and keep going.
    #[must_use]
    pub const fn lenient(verb: &'a str) -> Self {
        Self {
            verb,
            bail_on_error: false,
        }
    }
}

/// Reconcile one resource: apply it unless it is already correct.
///
/// Errors and [`ResourceState::Invalid`] become
/// [`InstallResult::SkippedOptionalFailure`] under lenient options; strict
/// options propagate them.
///
/// # Errors
///
/// Returns an error if `opts.bail_on_error` is set and the resource cannot
/// be checked or applied.
pub fn process_one<R: Resource>(
    ctx: &Context,
    resource: &R,
    opts: &ProcessOpts,
) -> Result<InstallResult> {
    let desc = resource.description();
    let outcome = resource
        .current_state()
        .and_then(|state| apply_state(ctx, resource, state, opts));
    match outcome {
        Ok(result) => Ok(result),
        Err(e) if opts.bail_on_error => Err(e.context(format!("failed to {} {desc}", opts.verb))),
        Err(e) => {
            ctx.log.warn(&format!("failed to {} {desc}: {e:#}", opts.verb));
            Ok(InstallResult::SkippedOptionalFailure {
                reason: format!("{e:#}"),
            })
        }
    }
}

fn apply_state<R: Resource>(
    ctx: &Context,
    resource: &R,
    state: ResourceState,
    opts: &ProcessOpts,
) -> Result<InstallResult> {
    let desc = resource.description();
    match state {
        ResourceState::Correct => {
            ctx.log.debug(&format!("ok: {desc}"));
            Ok(InstallResult::AlreadyPresent)
        }
        ResourceState::Invalid { reason } => anyhow::bail!(reason),
        ResourceState::Missing | ResourceState::Incorrect { .. } => {
            match resource.apply()? {
                ResourceChange::Applied => {
                    ctx.log.debug(&format!("{}: {desc}", opts.verb));
                    Ok(InstallResult::Installed { name: desc })
                }
                ResourceChange::AlreadyCorrect => Ok(InstallResult::AlreadyPresent),
                ResourceChange::Skipped { reason } => anyhow::bail!(reason),
            }
        }
    }
}

/// Process resources in order, collecting stats.
///
/// # Errors
///
/// Returns the first error when `opts.bail_on_error` is set.
pub fn process_resources<R: Resource>(
    ctx: &Context,
    resources: impl IntoIterator<Item = R>,
    opts: &ProcessOpts,
) -> Result<TaskStats> {
    let mut stats = TaskStats::new();
    for resource in resources {
        stats.count(&process_one(ctx, &resource, opts)?);
    }
    Ok(stats)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::Applicable;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::make_context;
    use std::cell::Cell;
    use std::path::Path;

    struct Stub {
        state: ResourceState,
        change: Result<ResourceChange, String>,
        applied: Cell<bool>,
    }

    impl Stub {
        fn new(state: ResourceState, change: Result<ResourceChange, String>) -> Self {
            Self {
                state,
                change,
                applied: Cell::new(false),
            }
        }
    }

    impl Applicable for Stub {
        fn description(&self) -> String {
            "stub".to_string()
        }

        fn apply(&self) -> Result<ResourceChange> {
            self.applied.set(true);
            self.change.clone().map_err(|e| anyhow::anyhow!(e))
        }
    }

    impl Resource for Stub {
        fn current_state(&self) -> Result<ResourceState> {
            Ok(self.state.clone())
        }
    }

    fn ctx() -> Context {
        make_context(Path::new("/home/alice"), MockExecutor::succeeding())
    }

    #[test]
    fn correct_resource_is_not_applied() {
        let stub = Stub::new(ResourceState::Correct, Ok(ResourceChange::Applied));
        let result = process_one(&ctx(), &stub, &ProcessOpts::strict("install")).unwrap();
        assert_eq!(result, InstallResult::AlreadyPresent);
        assert!(!stub.applied.get());
    }

    #[test]
    fn missing_resource_is_applied() {
        let stub = Stub::new(ResourceState::Missing, Ok(ResourceChange::Applied));
        let result = process_one(&ctx(), &stub, &ProcessOpts::strict("install")).unwrap();
        assert!(matches!(result, InstallResult::Installed { .. }));
        assert!(stub.applied.get());
    }

    #[test]
    fn lenient_failure_is_skipped() {
        let stub = Stub::new(ResourceState::Missing, Err("network down".to_string()));
        let result = process_one(&ctx(), &stub, &ProcessOpts::lenient("clone")).unwrap();
        assert!(
            matches!(result, InstallResult::SkippedOptionalFailure { ref reason } if reason == "network down")
        );
    }

    #[test]
    fn strict_failure_propagates() {
        let stub = Stub::new(ResourceState::Missing, Err("network down".to_string()));
        let err = process_one(&ctx(), &stub, &ProcessOpts::strict("install")).unwrap_err();
        assert!(format!("{err:#}").contains("failed to install stub"));
    }

    #[test]
    fn invalid_state_never_applies() {
        let stub = Stub::new(
            ResourceState::Invalid {
                reason: "regular file".to_string(),
            },
            Ok(ResourceChange::Applied),
        );
        let result = process_one(&ctx(), &stub, &ProcessOpts::lenient("link")).unwrap();
        assert!(matches!(result, InstallResult::SkippedOptionalFailure { .. }));
        assert!(!stub.applied.get());
    }

    #[test]
    fn stats_finish_reports_partial_on_failure() {
        let ctx = ctx();
        let resources = vec![
            Stub::new(ResourceState::Correct, Ok(ResourceChange::Applied)),
            Stub::new(ResourceState::Missing, Ok(ResourceChange::Applied)),
            Stub::new(ResourceState::Missing, Err("boom".to_string())),
        ];
        let stats = process_resources(&ctx, resources, &ProcessOpts::lenient("x")).unwrap();
        assert_eq!(
            stats,
            TaskStats {
                changed: 1,
                already_ok: 1,
                failed: 1
            }
        );
        assert!(matches!(stats.finish(&ctx), TaskResult::Partial(_)));
    }
}
