use anyhow::{Context as _, Result};
use std::fs;

use super::{Context, Task, TaskResult};
use crate::report::EntryKind;
use crate::zshrc::{ZshrcDocument, fallback_base, managed_blocks, sources_framework};

/// Render `~/.zshrc` from the install report and the manifest.
#[derive(Debug)]
pub struct ConfigureZshrc;

impl Task for ConfigureZshrc {
    fn name(&self) -> &'static str {
        "Configure zshrc"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let zshrc = ctx.paths.zshrc();
        let existing = fs::read_to_string(&zshrc).ok();
        let base = match &existing {
            Some(text) if sources_framework(text) => text.clone(),
            Some(text) => {
                ctx.log
                    .debug("existing config does not load the framework, prepending it");
                format!("{}\n{text}", base_without_config(ctx)?)
            }
            None => base_without_config(ctx)?,
        };

        let rendered = render(ctx, base);
        if existing.as_deref() == Some(rendered.as_str()) {
            ctx.log.info("~/.zshrc already up to date");
        } else {
            fs::write(&zshrc, &rendered)
                .with_context(|| format!("write {}", zshrc.display()))?;
            ctx.log.info(&format!("wrote {}", zshrc.display()));
        }

        let snippets = ctx.paths.zshrc_d();
        fs::create_dir_all(&snippets)
            .with_context(|| format!("create {}", snippets.display()))?;
        Ok(TaskResult::Ok)
    }
}

/// The framework template, or a minimal config when it is missing.
fn base_without_config(ctx: &Context) -> Result<String> {
    let template = ctx.paths.template();
    if template.is_file() {
        return fs::read_to_string(&template)
            .with_context(|| format!("read {}", template.display()));
    }
    ctx.log
        .debug("no framework template, starting from a minimal config");
    Ok(fallback_base(
        &ctx.paths.framework.display().to_string(),
        &ctx.config.framework.default_theme,
    ))
}

fn render(ctx: &Context, base: String) -> String {
    let config = &ctx.config;
    let report = ctx.report();

    let theme = match &config.theme {
        Some(theme) if !report.is_failed(EntryKind::Theme, &theme.name) => theme.name.clone(),
        Some(theme) => {
            ctx.log.warn(&format!(
                "theme {} unavailable, using {}",
                theme.name, config.framework.default_theme
            ));
            config.framework.default_theme.clone()
        }
        None => config.framework.default_theme.clone(),
    };

    let plugins: Vec<&str> = config
        .plugins
        .iter()
        .filter(|p| {
            let failed = report.is_failed(EntryKind::Plugin, &p.name);
            if failed {
                ctx.log
                    .warn(&format!("leaving plugin {} out of plugins=()", p.name));
            }
            !failed
        })
        .map(|p| p.name.as_str())
        .collect();

    let blocks = managed_blocks(&report.present_tools(), config);
    drop(report);

    let mut doc = ZshrcDocument::new(base, &theme).plugins(plugins).blocks(blocks);
    if ctx.paths.framework != ctx.paths.home.join(".oh-my-zsh") {
        doc = doc.framework_dir(&ctx.paths.framework.display().to_string());
    }
    if ctx.paths.custom != ctx.paths.framework.join("custom") {
        doc = doc.custom_dir(&ctx.paths.custom.display().to_string());
    }
    doc.render()
}
