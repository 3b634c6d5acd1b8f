use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::platform::OsProfile;
use crate::report::{EntryKind, InstallReport, InstallResult};

/// Filesystem locations the bootstrapper reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    /// User's home directory.
    pub home: PathBuf,
    /// Framework checkout (`$ZSH`).
    pub framework: PathBuf,
    /// Framework customisation root (`$ZSH_CUSTOM`).
    pub custom: PathBuf,
}

impl Paths {
    /// Resolve from `HOME`, `ZSH` and `ZSH_CUSTOM`.
    ///
    /// # Errors
    ///
    /// Returns an error if `HOME` is not set.
    pub fn from_env() -> Result<Self> {
        let home = std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(PathBuf::from)
            .ok_or_else(|| anyhow::anyhow!("HOME environment variable is not set"))?;
        let framework = non_empty_var("ZSH").unwrap_or_else(|| home.join(".oh-my-zsh"));
        let custom = non_empty_var("ZSH_CUSTOM").unwrap_or_else(|| framework.join("custom"));
        Ok(Self {
            home,
            framework,
            custom,
        })
    }

    /// Default layout under `home`, ignoring the environment.
    #[must_use]
    pub fn under_home(home: &Path) -> Self {
        let framework = home.join(".oh-my-zsh");
        let custom = framework.join("custom");
        Self {
            home: home.to_path_buf(),
            framework,
            custom,
        }
    }

    #[must_use]
    pub fn zshrc(&self) -> PathBuf {
        self.home.join(".zshrc")
    }

    /// Single backup slot, overwritten on every run that finds a config.
    #[must_use]
    pub fn zshrc_backup(&self) -> PathBuf {
        self.home.join(".zshrc.pre-bootstrap")
    }

    /// Directory of user snippets sourced by the managed section.
    #[must_use]
    pub fn zshrc_d(&self) -> PathBuf {
        self.home.join(".zshrc.d")
    }

    #[must_use]
    pub fn local_bin(&self) -> PathBuf {
        self.home.join(".local").join("bin")
    }

    #[must_use]
    pub fn font_dir(&self) -> PathBuf {
        self.home.join(".local").join("share").join("fonts")
    }

    /// The framework's stock `~/.zshrc`.
    #[must_use]
    pub fn template(&self) -> PathBuf {
        self.framework.join("templates").join("zshrc.zsh-template")
    }
}

fn non_empty_var(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Shared context for task execution.
pub struct Context {
    /// Manifest loaded at startup.
    pub config: Arc<Config>,
    /// Detected distribution and package manager.
    pub profile: Arc<OsProfile>,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    pub paths: Paths,
    /// Outcome of every package, link and clone reconciled so far.
    pub report: Arc<RwLock<InstallReport>>,
    /// Set once the package index has been refreshed this run.
    pub index_refreshed: Arc<AtomicBool>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &"<Config>")
            .field("profile", &self.profile)
            .field("log", &"<dyn Log>")
            .field("executor", &"<dyn Executor>")
            .field("paths", &self.paths)
            .field("index_refreshed", &self.index_refreshed)
            .finish_non_exhaustive()
    }
}

impl Context {
    /// Creates a new context with an empty report.
    #[must_use]
    pub fn new(
        config: Arc<Config>,
        profile: Arc<OsProfile>,
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        paths: Paths,
    ) -> Self {
        Self {
            config,
            profile,
            log,
            executor,
            paths,
            report: Arc::new(RwLock::new(InstallReport::new())),
            index_refreshed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Acquire a read guard on the report.
    ///
    /// Recovers from a poisoned lock, since the report is append-only.
    pub fn report(&self) -> RwLockReadGuard<'_, InstallReport> {
        self.report
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Append an outcome to the report.
    pub fn record(&self, kind: EntryKind, name: &str, result: InstallResult) {
        self.report
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .record(kind, name, result);
    }
}
