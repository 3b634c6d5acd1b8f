use std::sync::Arc;

use anyhow::Result;

use super::run_tasks_to_completion;
use crate::config::Config;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger};
use crate::platform::OsProfile;
use crate::tasks::{self, Context, Paths};

/// Run the bootstrap.
///
/// Platform detection and manifest loading happen before anything on the
/// system is modified.
///
/// # Errors
///
/// Returns an error if the distribution is unsupported, the manifest cannot
/// be loaded, `HOME` is unset, or a task fails.
pub fn run(log: &Arc<Logger>) -> Result<()> {
    let version = option_env!("ZSH_BOOTSTRAP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("zsh-bootstrap {version}"));

    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);

    log.stage("Detecting platform");
    let elevate = needs_elevation(executor.as_ref());
    let profile = OsProfile::detect()?.with_elevation(elevate);
    log.info(&format!("platform: {profile}"));
    if elevate {
        if executor.which("sudo") {
            log.info("package manager runs through sudo");
        } else {
            log.warn("not running as root and sudo not found; package installs will fail");
        }
    }

    log.stage("Loading configuration");
    let config = Config::load()?;
    log.info(&format!(
        "loaded {} packages, {} plugins, {} fonts",
        config.packages.len(),
        config.plugins.len(),
        config.fonts.len()
    ));
    let warnings = config.validate();
    if !warnings.is_empty() {
        log.warn(&format!(
            "found {} configuration warning(s):",
            warnings.len()
        ));
        for warning in &warnings {
            log.warn(&format!(
                "  {} [{}]: {}",
                warning.source, warning.item, warning.message
            ));
        }
    }

    let paths = Paths::from_env()?;
    log.debug(&format!("paths: {paths:?}"));

    let ctx = Context::new(
        Arc::new(config),
        Arc::new(profile),
        Arc::clone(log) as Arc<dyn Log>,
        executor,
        paths,
    );

    let all = tasks::all_tasks();
    run_tasks_to_completion(all.iter().map(AsRef::as_ref), &ctx, log)
}

/// Anyone but root goes through `sudo` for the package manager.
fn needs_elevation(executor: &dyn Executor) -> bool {
    executor
        .run_unchecked("id", &["-u"])
        .ok()
        .filter(|r| r.success)
        .is_none_or(|r| r.stdout.trim() != "0")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::resources::test_helpers::MockExecutor;

    #[test]
    fn root_needs_no_elevation() {
        assert!(!needs_elevation(&MockExecutor::ok("0\n")));
    }

    #[test]
    fn regular_user_needs_elevation() {
        let mock = MockExecutor::ok("1000\n");
        assert!(needs_elevation(&mock));
        assert_eq!(mock.calls(), vec!["id -u"]);
    }

    #[test]
    fn unknown_uid_assumes_elevation() {
        assert!(needs_elevation(&MockExecutor::fail()));
    }
}
