//! Per-tool install outcomes aggregated over a run.
use std::collections::BTreeSet;
use std::fmt;

/// Outcome of reconciling one tool, package or clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallResult {
    /// Already on the system; nothing was run.
    AlreadyPresent,
    /// Installed during this run under `name`.
    Installed {
        /// The package, link target or path that satisfied the request.
        name: String,
    },
    /// An optional item failed; the run continues without it.
    SkippedOptionalFailure {
        /// Why it failed.
        reason: String,
    },
    /// A required item failed; the run must stop.
    FatalFailure {
        /// Why it failed.
        reason: String,
    },
}

impl InstallResult {
    /// The item is usable after reconciliation.
    #[must_use]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::AlreadyPresent | Self::Installed { .. })
    }

    /// The item failed in a way that aborts the run.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::FatalFailure { .. })
    }
}

impl fmt::Display for InstallResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyPresent => write!(f, "already present"),
            Self::Installed { name } => write!(f, "installed {name}"),
            Self::SkippedOptionalFailure { reason } => write!(f, "skipped: {reason}"),
            Self::FatalFailure { reason } => write!(f, "failed: {reason}"),
        }
    }
}

/// What a report entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    Package,
    Alternate,
    Jump,
    Framework,
    Theme,
    Plugin,
}

impl EntryKind {
    /// Entries whose name is a command-line tool the rendered zshrc can rely on.
    const fn is_tool(self) -> bool {
        matches!(self, Self::Package | Self::Alternate | Self::Jump)
    }
}

/// One recorded outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub kind: EntryKind,
    pub name: String,
    pub result: InstallResult,
}

/// Ordered record of every outcome in a run.
///
/// Later entries for the same tool supersede earlier ones, so a package
/// reconciled on behalf of an alternate binary is judged by the final
/// alternate outcome.
#[derive(Debug, Clone, Default)]
pub struct InstallReport {
    entries: Vec<ReportEntry>,
}

impl InstallReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an outcome.
    pub fn record(&mut self, kind: EntryKind, name: &str, result: InstallResult) {
        self.entries.push(ReportEntry {
            kind,
            name: name.to_string(),
            result,
        });
    }

    /// All entries in recording order.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    fn latest(&self, kind: Option<EntryKind>, name: &str) -> Option<&ReportEntry> {
        self.entries.iter().rev().find(|e| {
            e.name == name && kind.map_or_else(|| e.kind.is_tool(), |k| e.kind == k)
        })
    }

    /// Whether the tool `name` ended up usable.
    #[must_use]
    pub fn is_present(&self, name: &str) -> bool {
        self.latest(None, name)
            .is_some_and(|e| e.result.is_present())
    }

    /// Whether the latest entry of `kind` for `name` is a failure.
    #[must_use]
    pub fn is_failed(&self, kind: EntryKind, name: &str) -> bool {
        self.latest(Some(kind), name)
            .is_some_and(|e| !e.result.is_present())
    }

    /// Names of every tool whose latest outcome is usable.
    #[must_use]
    pub fn present_tools(&self) -> BTreeSet<String> {
        self.entries
            .iter()
            .filter(|e| e.kind.is_tool())
            .map(|e| e.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|name| self.is_present(name))
            .map(String::from)
            .collect()
    }

    /// The first fatal entry, if any.
    #[must_use]
    pub fn first_fatal(&self) -> Option<&ReportEntry> {
        self.entries.iter().find(|e| e.result.is_fatal())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn skipped(reason: &str) -> InstallResult {
        InstallResult::SkippedOptionalFailure {
            reason: reason.to_string(),
        }
    }

    #[test]
    fn presence_follows_latest_entry() {
        let mut r = InstallReport::new();
        r.record(EntryKind::Package, "bat", skipped("not found"));
        assert!(!r.is_present("bat"));
        r.record(
            EntryKind::Alternate,
            "bat",
            InstallResult::Installed {
                name: "batcat".to_string(),
            },
        );
        assert!(r.is_present("bat"));
    }

    #[test]
    fn clones_are_not_tools() {
        let mut r = InstallReport::new();
        r.record(EntryKind::Plugin, "zsh-autosuggestions", InstallResult::AlreadyPresent);
        assert!(!r.is_present("zsh-autosuggestions"));
        assert!(r.present_tools().is_empty());
    }

    #[test]
    fn is_failed_is_scoped_by_kind() {
        let mut r = InstallReport::new();
        r.record(EntryKind::Plugin, "git", skipped("clone failed"));
        r.record(EntryKind::Package, "git", InstallResult::AlreadyPresent);
        assert!(r.is_failed(EntryKind::Plugin, "git"));
        assert!(!r.is_failed(EntryKind::Package, "git"));
        assert!(!r.is_failed(EntryKind::Theme, "git"));
    }

    #[test]
    fn present_tools_is_sorted_and_deduplicated() {
        let mut r = InstallReport::new();
        r.record(EntryKind::Package, "zsh", InstallResult::AlreadyPresent);
        r.record(EntryKind::Package, "fzf", InstallResult::AlreadyPresent);
        r.record(EntryKind::Package, "ripgrep", skipped("no repo"));
        r.record(EntryKind::Jump, "zoxide", InstallResult::AlreadyPresent);
        let tools: Vec<_> = r.present_tools().into_iter().collect();
        assert_eq!(tools, vec!["fzf", "zoxide", "zsh"]);
    }

    #[test]
    fn first_fatal_finds_required_failure() {
        let mut r = InstallReport::new();
        r.record(EntryKind::Package, "fzf", skipped("x"));
        r.record(
            EntryKind::Package,
            "zsh",
            InstallResult::FatalFailure {
                reason: "no mirror".to_string(),
            },
        );
        assert_eq!(r.first_fatal().unwrap().name, "zsh");
    }

    #[test]
    fn display() {
        assert_eq!(InstallResult::AlreadyPresent.to_string(), "already present");
        assert_eq!(skipped("boom").to_string(), "skipped: boom");
    }
}
