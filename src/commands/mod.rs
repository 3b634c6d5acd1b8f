pub mod bootstrap;

use anyhow::Result;

use crate::logging::Logger;
use crate::tasks::{self, Context, Task};

/// Execute tasks in order, print the summary, and bail if any task failed.
///
/// A failing critical task stops the run; later tasks are not attempted.
///
/// # Errors
///
/// Returns the critical task's error, or an error if one or more tasks
/// recorded a failure.
pub fn run_tasks_to_completion<'a>(
    tasks: impl IntoIterator<Item = &'a dyn Task>,
    ctx: &Context,
    log: &Logger,
) -> Result<()> {
    let mut aborted = None;
    for task in tasks {
        if let Err(e) = tasks::execute(task, ctx) {
            aborted = Some(e.context(format!("{} failed", task.name())));
            break;
        }
    }

    log.print_summary();

    if let Some(e) = aborted {
        return Err(e);
    }
    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} task(s) failed");
    }
    Ok(())
}
