//! Tools installed by piping an upstream script through `sh`.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::download::download;
use super::{Applicable, Resource, ResourceChange, ResourceError, ResourceState};
use crate::exec::{Executor, Invocation};

/// Evidence that a script-installed tool is already present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Probe {
    /// A file or directory exists.
    Path(PathBuf),
    /// A binary resolves on PATH.
    Binary(String),
}

/// A remote installer script run once when none of its probes match.
#[derive(Debug)]
pub struct ScriptInstallerResource<'a> {
    pub name: String,
    pub url: String,
    probes: Vec<Probe>,
    args: Vec<String>,
    env: Vec<(String, String)>,
    executor: &'a dyn Executor,
}

impl<'a> ScriptInstallerResource<'a> {
    /// Create an installer with no probes, arguments or environment.
    #[must_use]
    pub const fn new(name: String, url: String, executor: &'a dyn Executor) -> Self {
        Self {
            name,
            url,
            probes: Vec::new(),
            args: Vec::new(),
            env: Vec::new(),
            executor,
        }
    }

    #[must_use]
    pub fn probe(mut self, probe: Probe) -> Self {
        self.probes.push(probe);
        self
    }

    /// Pass an argument to the script.
    #[must_use]
    pub fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Set an environment variable for the script.
    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.env.push((key.to_string(), value.to_string()));
        self
    }

    fn satisfied(&self, probe: &Probe) -> bool {
        match probe {
            Probe::Path(p) => p.exists(),
            Probe::Binary(b) => self.executor.which(b),
        }
    }
}

impl Applicable for ScriptInstallerResource<'_> {
    fn description(&self) -> String {
        format!("{} ({})", self.name, self.url)
    }

    fn apply(&self) -> Result<ResourceChange> {
        // private 0700 directory, removed when dropped
        let dir = tempfile::Builder::new()
            .prefix(&format!("zsh-bootstrap-{}-", self.name))
            .tempdir()
            .context("create installer directory")?;
        let script = dir.path().join("install.sh");
        download(self.executor, &self.url, &script)?;

        let mut cmd = Invocation::new("sh", [script.to_string_lossy().into_owned()]);
        cmd.args.extend(self.args.iter().cloned());
        for (k, v) in &self.env {
            cmd = cmd.with_env(k, v);
        }
        cmd.run(self.executor)
            .map_err(|e| ResourceError::execution(format!("{} installer", self.name), &e))?;

        Ok(ResourceChange::Applied)
    }
}

impl Resource for ScriptInstallerResource<'_> {
    fn current_state(&self) -> Result<ResourceState> {
        if self.probes.iter().any(|p| self.satisfied(p)) {
            Ok(ResourceState::Correct)
        } else {
            Ok(ResourceState::Missing)
        }
    }
}
