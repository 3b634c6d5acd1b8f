use anyhow::Result;

use super::{Context, ProcessOpts, Task, TaskResult, process_resources};
use crate::resources::font::FontResource;

/// Download the terminal fonts into `~/.local/share/fonts`.
#[derive(Debug)]
pub struct InstallFonts;

impl Task for InstallFonts {
    fn name(&self) -> &'static str {
        "Install fonts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.fonts.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let dir = ctx.paths.font_dir();
        let resources = ctx.config.fonts.iter().map(|font| {
            FontResource::new(
                font.url.clone(),
                dir.join(&font.file),
                ctx.executor.as_ref(),
            )
        });
        let stats = process_resources(ctx, resources, &ProcessOpts::lenient("download"))?;

        if stats.changed > 0 {
            refresh_font_cache(ctx, &dir.display().to_string());
        }
        Ok(stats.finish(ctx))
    }
}

fn refresh_font_cache(ctx: &Context, dir: &str) {
    if !ctx.executor.which("fc-cache") {
        ctx.log.debug("fc-cache not found, skipping font cache refresh");
        return;
    }
    if let Err(e) = ctx.executor.run("fc-cache", &["-f", dir]) {
        ctx.log.warn(&format!("font cache refresh failed: {e:#}"));
    }
}
