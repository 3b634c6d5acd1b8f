use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, TaskStats, process_one};
use crate::report::{EntryKind, InstallResult};
use crate::resources::installer::{Probe, ScriptInstallerResource};
use crate::resources::repository::RepositoryResource;

/// Install oh-my-zsh unattended into `$ZSH`.
#[derive(Debug)]
pub struct InstallFramework;

impl Task for InstallFramework {
    fn name(&self) -> &'static str {
        "Install oh-my-zsh"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn critical(&self) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dir = ctx.paths.framework.display().to_string();
        // the installer must neither start zsh, prompt for chsh, nor replace ~/.zshrc
        let installer = ScriptInstallerResource::new(
            "oh-my-zsh".to_string(),
            ctx.config.framework.installer_url.clone(),
            ctx.executor.as_ref(),
        )
        .probe(Probe::Path(ctx.paths.framework.clone()))
        .arg("--unattended")
        .env("ZSH", &dir)
        .env("RUNZSH", "no")
        .env("CHSH", "no")
        .env("KEEP_ZSHRC", "yes");

        let result = process_one(ctx, &installer, &ProcessOpts::strict("install"))?;
        ctx.record(EntryKind::Framework, "oh-my-zsh", result.clone());
        if result == InstallResult::AlreadyPresent {
            ctx.log.info(&format!("already installed at {dir}"));
        } else {
            ctx.log.info(&format!("installed into {dir}"));
        }
        Ok(TaskResult::Ok)
    }
}

/// Clone the theme and third-party plugins into `$ZSH_CUSTOM`.
///
/// Existing checkouts are never re-cloned or updated. Each clone is
/// independent; failures are recorded so the configurator can leave the
/// item out.
#[derive(Debug)]
pub struct InstallThemeAndPlugins;

impl Task for InstallThemeAndPlugins {
    fn name(&self) -> &'static str {
        "Install theme and plugins"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.config.theme.is_some() || ctx.config.plugins.iter().any(|p| p.url.is_some())
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let opts = ProcessOpts::lenient("clone");
        let mut stats = TaskStats::new();

        if let Some(theme) = &ctx.config.theme {
            let dest = ctx.paths.custom.join("themes").join(theme.checkout_dir());
            let repo = RepositoryResource::new(theme.url.clone(), dest, ctx.executor.as_ref());
            let result = process_one(ctx, &repo, &opts)?;
            stats.count(&result);
            ctx.record(EntryKind::Theme, &theme.name, result);
        }

        for plugin in &ctx.config.plugins {
            let Some(url) = &plugin.url else {
                continue;
            };
            let dest = ctx.paths.custom.join("plugins").join(&plugin.name);
            let repo = RepositoryResource::new(url.clone(), dest, ctx.executor.as_ref());
            let result = process_one(ctx, &repo, &opts)?;
            stats.count(&result);
            ctx.record(EntryKind::Plugin, &plugin.name, result);
        }

        Ok(stats.finish(ctx))
    }
}
