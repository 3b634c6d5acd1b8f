use anyhow::Result;
use std::sync::atomic::Ordering;

use super::{Context, Task, TaskResult, TaskStats};
use crate::config::packages::PackageSpec;
use crate::error::TaskError;
use crate::report::{EntryKind, InstallResult};
use crate::resources::package::PackageResource;

/// Install manifest packages one at a time.
#[derive(Debug)]
pub struct InstallPackages;

impl Task for InstallPackages {
    fn name(&self) -> &'static str {
        "Install packages"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.packages.is_empty()
    }

    fn critical(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        for spec in &ctx.config.packages {
            let result = install_package(ctx, spec);
            stats.count(&result);
            ctx.record(EntryKind::Package, &spec.name, result.clone());
            if let InstallResult::FatalFailure { reason } = result {
                return Err(TaskError::RequiredPackage {
                    package: spec.name.clone(),
                    reason,
                }
                .into());
            }
        }
        Ok(stats.finish(ctx))
    }
}

/// Reconcile a single package, refreshing the index first if it is missing.
///
/// The caller decides under which name the outcome is recorded.
pub fn install_package(ctx: &Context, spec: &PackageSpec) -> InstallResult {
    let resource = PackageResource::new(spec, &ctx.profile, ctx.executor.as_ref());
    if let Some(path) = resource.installed_as() {
        ctx.log
            .debug(&format!("ok: {} ({})", spec.name, path.display()));
        return InstallResult::AlreadyPresent;
    }

    refresh_index(ctx);
    let result = resource.ensure();
    match &result {
        InstallResult::Installed { name } => ctx.log.info(&format!("installed {name}")),
        InstallResult::SkippedOptionalFailure { reason } => ctx
            .log
            .warn(&format!("optional package {} unavailable: {reason}", spec.name)),
        InstallResult::FatalFailure { .. } | InstallResult::AlreadyPresent => {}
    }
    result
}

/// Update the package index at most once per run. Failure is only a warning.
fn refresh_index(ctx: &Context) {
    if ctx.index_refreshed.swap(true, Ordering::SeqCst) {
        return;
    }
    let cmd = ctx.profile.update_command();
    ctx.log.info(&format!("refreshing package index: {cmd}"));
    if let Err(e) = cmd.run(ctx.executor.as_ref()) {
        ctx.log
            .warn(&format!("package index refresh failed: {e:#}"));
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::resources::test_helpers::MockExecutor;
    use crate::tasks::test_helpers::context_with;
    use std::path::Path;
    use std::sync::Arc;

    fn config(packages: Vec<PackageSpec>) -> Config {
        let mut config = Config::embedded().unwrap();
        config.packages = packages;
        config
    }

    fn required(name: &str) -> PackageSpec {
        PackageSpec {
            required: true,
            ..PackageSpec::optional(name)
        }
    }

    #[test]
    fn present_packages_run_nothing() {
        let mock = Arc::new(MockExecutor::succeeding().with_binary("zsh").with_binary("git"));
        let ctx = context_with(
            Path::new("/home/test"),
            config(vec![required("zsh"), required("git")]),
            mock.clone(),
        );
        let result = InstallPackages.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Ok));
        assert_eq!(mock.call_count(), 0, "no index refresh, no installs");
        assert!(ctx.report().is_present("zsh"));
    }

    #[test]
    fn index_refreshes_once_for_several_missing_packages() {
        let mock = Arc::new(MockExecutor::succeeding());
        let ctx = context_with(
            Path::new("/home/test"),
            config(vec![PackageSpec::optional("fzf"), PackageSpec::optional("zsh")]),
            mock.clone(),
        );
        InstallPackages.run(&ctx).unwrap();
        assert_eq!(
            mock.calls(),
            vec![
                "apt-get update",
                "apt-get install -y fzf",
                "apt-get install -y zsh"
            ]
        );
    }

    #[test]
    fn failed_index_refresh_is_not_fatal() {
        let mock = Arc::new(MockExecutor::with_responses(vec![
            (false, String::new()),
            (true, String::new()),
        ]));
        let ctx = context_with(
            Path::new("/home/test"),
            config(vec![required("zsh")]),
            mock.clone(),
        );
        assert!(InstallPackages.run(&ctx).is_ok());
        assert!(ctx.report().is_present("zsh"));
        assert_eq!(mock.calls(), vec!["apt-get update", "apt-get install -y zsh"]);
    }

    #[test]
    fn optional_failure_is_partial() {
        let mock = Arc::new(MockExecutor::with_responses(vec![(true, String::new())]));
        let ctx = context_with(
            Path::new("/home/test"),
            config(vec![PackageSpec::optional("ripgrep")]),
            mock.clone(),
        );
        let result = InstallPackages.run(&ctx).unwrap();
        assert!(matches!(result, TaskResult::Partial(_)));
        assert!(!ctx.report().is_present("ripgrep"));
    }

    #[test]
    fn required_failure_is_fatal_and_stops() {
        let mock = Arc::new(MockExecutor::with_responses(vec![(true, String::new())]));
        let ctx = context_with(
            Path::new("/home/test"),
            config(vec![required("zsh"), PackageSpec::optional("fzf")]),
            mock.clone(),
        );
        let err = InstallPackages.run(&ctx).unwrap_err();
        assert!(err.to_string().contains("required package 'zsh'"));
        assert_eq!(mock.calls(), vec!["apt-get update", "apt-get install -y zsh"]);
        assert!(ctx.report().first_fatal().is_some());
    }

    #[test]
    fn alternate_name_is_tried_after_canonical() {
        let mock = Arc::new(MockExecutor::with_responses(vec![
            (true, String::new()),
            (false, String::new()),
            (true, String::new()),
        ]));
        let spec = PackageSpec {
            alternates: vec!["passwd".to_string()],
            binaries: vec!["chsh".to_string()],
            ..PackageSpec::optional("util-linux-user")
        };
        let ctx = context_with(Path::new("/home/test"), config(vec![spec]), mock.clone());
        InstallPackages.run(&ctx).unwrap();
        assert_eq!(
            mock.calls(),
            vec![
                "apt-get update",
                "apt-get install -y util-linux-user",
                "apt-get install -y passwd"
            ]
        );
    }
}
