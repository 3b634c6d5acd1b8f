//! Symlink exposing a tool under the name the shell config expects.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{ensure_parent_dir, remove_existing};
use super::{Applicable, Resource, ResourceChange, ResourceState};

/// `link` → `target`, e.g. `~/.local/bin/bat` → `/usr/bin/batcat`.
///
/// A stale link is replaced. Anything at `link` that is not a symlink is
/// left alone and reported as [`ResourceState::Invalid`].
#[derive(Debug, Clone)]
pub struct AliasLinkResource {
    /// The resolved executable the link points at.
    pub target: PathBuf,
    /// Where the link lives.
    pub link: PathBuf,
}

impl AliasLinkResource {
    /// Create a new alias link resource.
    #[must_use]
    pub const fn new(target: PathBuf, link: PathBuf) -> Self {
        Self { target, link }
    }
}

impl Applicable for AliasLinkResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.link.display(), self.target.display())
    }

    fn apply(&self) -> Result<ResourceChange> {
        match self.current_state()? {
            ResourceState::Correct => return Ok(ResourceChange::AlreadyCorrect),
            ResourceState::Invalid { reason } => return Ok(ResourceChange::Skipped { reason }),
            ResourceState::Missing | ResourceState::Incorrect { .. } => {}
        }

        ensure_parent_dir(&self.link)?;
        remove_existing(&self.link)?;
        std::os::unix::fs::symlink(&self.target, &self.link)
            .with_context(|| format!("create link: {}", self.description()))?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for AliasLinkResource {
    fn current_state(&self) -> Result<ResourceState> {
        let Ok(meta) = self.link.symlink_metadata() else {
            return Ok(ResourceState::Missing);
        };
        if !meta.is_symlink() {
            return Ok(ResourceState::Invalid {
                reason: format!("{} exists and is not a symlink", self.link.display()),
            });
        }
        let existing = std::fs::read_link(&self.link)
            .with_context(|| format!("read link: {}", self.link.display()))?;
        if existing == self.target {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Incorrect {
                current: format!("points to {}", existing.display()),
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn setup() -> (tempfile::TempDir, AliasLinkResource) {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("usr").join("batcat");
        std::fs::create_dir_all(target.parent().unwrap()).unwrap();
        std::fs::write(&target, "#!/bin/sh\n").unwrap();
        let link = dir.path().join(".local").join("bin").join("bat");
        (dir, AliasLinkResource::new(target, link))
    }

    #[test]
    fn missing_link_is_created_with_parent() {
        let (_dir, res) = setup();
        assert_eq!(res.current_state().unwrap(), ResourceState::Missing);
        assert_eq!(res.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_link(&res.link).unwrap(), res.target);
    }

    #[test]
    fn correct_link_is_left_alone() {
        let (_dir, res) = setup();
        res.apply().unwrap();
        assert_eq!(res.current_state().unwrap(), ResourceState::Correct);
        assert_eq!(res.apply().unwrap(), ResourceChange::AlreadyCorrect);
    }

    #[test]
    fn stale_link_is_replaced() {
        let (dir, res) = setup();
        std::fs::create_dir_all(res.link.parent().unwrap()).unwrap();
        std::os::unix::fs::symlink(dir.path().join("old"), &res.link).unwrap();
        assert!(matches!(
            res.current_state().unwrap(),
            ResourceState::Incorrect { .. }
        ));
        assert_eq!(res.apply().unwrap(), ResourceChange::Applied);
        assert_eq!(std::fs::read_link(&res.link).unwrap(), res.target);
    }

    #[test]
    fn regular_file_is_never_overwritten() {
        let (_dir, res) = setup();
        std::fs::create_dir_all(res.link.parent().unwrap()).unwrap();
        std::fs::write(&res.link, "user script").unwrap();
        assert!(matches!(
            res.apply().unwrap(),
            ResourceChange::Skipped { .. }
        ));
        assert_eq!(std::fs::read_to_string(&res.link).unwrap(), "user script");
    }
}
