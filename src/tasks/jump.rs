use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_one};
use crate::report::{EntryKind, InstallResult};
use crate::resources::installer::{Probe, ScriptInstallerResource};

/// Install the directory-jump tool (zoxide) with its upstream script.
///
/// The script drops the binary in `~/.local/bin`, which is not necessarily on
/// PATH yet, so both locations count as installed.
#[derive(Debug)]
pub struct InstallDirectoryJumper;

impl Task for InstallDirectoryJumper {
    fn name(&self) -> &'static str {
        "Install directory jumper"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.jump.is_some()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let Some(jump) = &ctx.config.jump else {
            return Ok(TaskResult::Skipped("no jump tool configured".to_string()));
        };

        let installer = ScriptInstallerResource::new(
            jump.binary.clone(),
            jump.installer_url.clone(),
            ctx.executor.as_ref(),
        )
        .probe(Probe::Binary(jump.binary.clone()))
        .probe(Probe::Path(ctx.paths.local_bin().join(&jump.binary)));

        let result = process_one(ctx, &installer, &ProcessOpts::lenient("install"))?;
        ctx.record(EntryKind::Jump, &jump.binary, result.clone());

        Ok(match result {
            InstallResult::AlreadyPresent => {
                TaskResult::Skipped(format!("{} already installed", jump.binary))
            }
            InstallResult::Installed { .. } => {
                ctx.log.info(&format!("installed {}", jump.binary));
                TaskResult::Ok
            }
            InstallResult::SkippedOptionalFailure { reason }
            | InstallResult::FatalFailure { reason } => TaskResult::Partial(reason),
        })
    }
}
