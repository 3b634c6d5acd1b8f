//! Named, ordered tasks that orchestrate resource changes.
pub mod alternates;
pub mod configure;
mod context;
pub mod dotfile;
pub mod fonts;
pub mod framework;
pub mod jump;
pub mod packages;
mod processing;
pub mod shell;

pub use context::{Context, Paths};
pub use processing::{ProcessOpts, TaskResult, TaskStats, process_one, process_resources};

use anyhow::Result;

use crate::logging::TaskStatus;

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task should run in the current environment.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Whether a failure aborts the run.
    ///
    /// Non-critical failures are recorded in the summary and the run moves
    /// on to the next task.
    fn critical(&self) -> bool {
        false
    }

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error if the task fails to execute, such as when system commands
    /// fail or file operations are not permitted.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// Every task in execution order.
///
/// Later tasks read what earlier ones recorded in the install report, so the
/// order is fixed.
#[must_use]
pub fn all_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(packages::InstallPackages),
        Box::new(alternates::ResolveAlternates),
        Box::new(jump::InstallDirectoryJumper),
        Box::new(dotfile::MigrateZshrc),
        Box::new(framework::InstallFramework),
        Box::new(framework::InstallThemeAndPlugins),
        Box::new(configure::ConfigureZshrc),
        Box::new(fonts::InstallFonts),
        Box::new(shell::ConfigureShell),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Returns the task's error if it fails and is [critical](Task::critical).
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
        }
        Ok(TaskResult::Partial(reason)) => {
            ctx.log
                .record_task(task.name(), TaskStatus::Partial, Some(&reason));
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            if task.critical() {
                return Err(e);
            }
        }
    }
    Ok(())
}
