//! Shallow git checkout of a theme or plugin.
use anyhow::Result;
use std::path::PathBuf;

use super::helpers::fs::ensure_parent_dir;
use super::{Applicable, Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::Executor;

/// A repository cloned once into `dest`.
///
/// An existing directory is trusted as-is; it is never re-cloned, pulled or
/// inspected.
#[derive(Debug)]
pub struct RepositoryResource<'a> {
    pub url: String,
    pub dest: PathBuf,
    executor: &'a dyn Executor,
}

impl<'a> RepositoryResource<'a> {
    /// Create a new repository resource.
    #[must_use]
    pub const fn new(url: String, dest: PathBuf, executor: &'a dyn Executor) -> Self {
        Self {
            url,
            dest,
            executor,
        }
    }
}

impl Applicable for RepositoryResource<'_> {
    fn description(&self) -> String {
        self.url.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        ensure_parent_dir(&self.dest)?;
        let dest = self.dest.to_string_lossy();
        let args = ["clone", "--depth=1", self.url.as_str(), dest.as_ref()];
        self.executor
            .run("git", &args)
            .map_err(|e| ResourceError::execution(format!("git {}", args.join(" ")), &e))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for RepositoryResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.dest.is_dir() {
            Ok(ResourceState::Correct)
        } else if self.dest.symlink_metadata().is_ok() {
            Ok(ResourceState::Invalid {
                reason: format!("{} exists and is not a directory", self.dest.display()),
            })
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
