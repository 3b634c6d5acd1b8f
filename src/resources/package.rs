//! Package installation resource.
use std::path::PathBuf;

use anyhow::Result;

use super::{Applicable, Resource, ResourceChange, ResourceError, ResourceState};
use crate::config::packages::PackageSpec;
use crate::exec::Executor;
use crate::platform::OsProfile;
use crate::report::InstallResult;

/// A package that can be probed on PATH and installed by name.
///
/// Presence is decided by the package's probe binaries, never by querying the
/// package database, so a tool installed by other means counts too.
#[derive(Debug)]
pub struct PackageResource<'a> {
    spec: &'a PackageSpec,
    profile: &'a OsProfile,
    executor: &'a dyn Executor,
}

impl<'a> PackageResource<'a> {
    /// Create a new package resource.
    #[must_use]
    pub const fn new(
        spec: &'a PackageSpec,
        profile: &'a OsProfile,
        executor: &'a dyn Executor,
    ) -> Self {
        Self {
            spec,
            profile,
            executor,
        }
    }

    /// Path of the first probe binary found on PATH.
    #[must_use]
    pub fn installed_as(&self) -> Option<PathBuf> {
        self.spec
            .probes()
            .into_iter()
            .find_map(|bin| self.executor.resolve(bin))
    }

    /// Install each candidate name in turn, stopping at the first success.
    ///
    /// Returns the name that installed.
    fn install_first(&self) -> Result<String, ResourceError> {
        let mut last = None;
        for name in self.spec.candidates() {
            let cmd = self.profile.install_command(name);
            match cmd.run(self.executor) {
                Ok(_) => return Ok(name.to_string()),
                Err(e) => last = Some(ResourceError::execution(cmd.to_string(), &e)),
            }
        }
        Err(last.unwrap_or_else(|| ResourceError::not_found(&self.spec.name)))
    }

    /// Reconcile the package.
    ///
    /// Nothing runs when a probe binary is already on PATH. Otherwise the
    /// canonical name and then each alternate is installed until one works.
    /// When all fail the result is fatal for a required package and a skip
    /// for an optional one.
    #[must_use]
    pub fn ensure(&self) -> InstallResult {
        if self.installed_as().is_some() {
            return InstallResult::AlreadyPresent;
        }
        match self.install_first() {
            Ok(name) => InstallResult::Installed { name },
            Err(e) if self.spec.required => InstallResult::FatalFailure {
                reason: e.to_string(),
            },
            Err(e) => InstallResult::SkippedOptionalFailure {
                reason: e.to_string(),
            },
        }
    }
}

impl Applicable for PackageResource<'_> {
    fn description(&self) -> String {
        self.spec.name.clone()
    }

    fn apply(&self) -> Result<ResourceChange> {
        self.install_first()?;
        Ok(ResourceChange::Applied)
    }
}

impl Resource for PackageResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        Ok(if self.installed_as().is_some() {
            ResourceState::Correct
        } else {
            ResourceState::Missing
        })
    }
}
