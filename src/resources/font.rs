use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::download::download;
use super::helpers::fs::{ensure_parent_dir, with_suffix};
use super::{Applicable, Resource, ResourceChange, ResourceState};
use crate::exec::Executor;

/// A font file fetched into the user font directory.
#[derive(Debug)]
pub struct FontResource<'a> {
    pub url: String,
    pub dest: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> FontResource<'a> {
    #[must_use]
    pub const fn new(url: String, dest: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            url,
            dest,
            executor,
        }
    }
}

impl Applicable for FontResource<'_> {
    fn description(&self) -> String {
        self.dest
            .file_name()
            .map_or_else(|| self.url.clone(), |n| n.to_string_lossy().into_owned())
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.dest)?;
        // download beside the target so a failed fetch never leaves a truncated font
        let partial = with_suffix(&self.dest, ".part");
        download(self.executor, &self.url, &partial)?;
        std::fs::rename(&partial, &self.dest)
            .with_context(|| format!("rename {} into place", partial.display()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for FontResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(if self.dest.is_file() {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}
