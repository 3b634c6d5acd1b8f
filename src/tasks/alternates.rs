use anyhow::Result;

use super::packages::install_package;
use super::{Context, ProcessOpts, Task, TaskResult, TaskStats, process_one};
use crate::config::packages::AlternateBinary;
use crate::report::{EntryKind, InstallResult};
use crate::resources::alias_link::AliasLinkResource;

/// Expose tools shipped under a different binary name (`batcat`, `fdfind`)
/// under the name the shell configuration uses.
#[derive(Debug)]
pub struct ResolveAlternates;

impl Task for ResolveAlternates {
    fn name(&self) -> &'static str {
        "Resolve alternate binaries"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.alternates.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let mut stats = TaskStats::new();
        for alt in &ctx.config.alternates {
            let result = resolve(ctx, alt);
            stats.count(&result);
            ctx.record(EntryKind::Alternate, &alt.binary, result);
        }
        Ok(stats.finish(ctx))
    }
}

fn resolve(ctx: &Context, alt: &AlternateBinary) -> InstallResult {
    let executor = ctx.executor.as_ref();
    if executor.which(&alt.binary) {
        ctx.log.debug(&format!("ok: {}", alt.binary));
        return InstallResult::AlreadyPresent;
    }

    if !executor.which(&alt.alternate_binary)
        && let Some(spec) = alt.package_spec()
    {
        install_package(ctx, &spec);
    }

    if let Some(path) = executor.resolve(&alt.binary) {
        return InstallResult::Installed {
            name: path.display().to_string(),
        };
    }

    let Some(target) = executor.resolve(&alt.alternate_binary) else {
        let reason = format!(
            "neither {} nor {} is on PATH",
            alt.binary, alt.alternate_binary
        );
        ctx.log.warn(&format!("{}: {reason}", alt.binary));
        return InstallResult::SkippedOptionalFailure { reason };
    };

    let link = AliasLinkResource::new(target, ctx.paths.local_bin().join(&alt.binary));
    process_one(ctx, &link, &ProcessOpts::lenient("link")).unwrap_or_else(|e| {
        InstallResult::SkippedOptionalFailure {
            reason: format!("{e:#}"),
        }
    })
}
