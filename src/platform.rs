//! Distribution detection from `/etc/os-release`.
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::PlatformError;
use crate::exec::Invocation;

/// Default location of the distribution metadata file.
pub const OS_RELEASE: &str = "/etc/os-release";

const DEBIAN_LIKE: &[&str] = &[
    "debian",
    "ubuntu",
    "linuxmint",
    "pop",
    "elementary",
    "zorin",
    "kali",
    "raspbian",
    "neon",
];

const RHEL_LIKE: &[&str] = &["rhel", "centos", "fedora", "rocky", "almalinux", "ol", "amzn"];

/// RHEL derivatives that still ship `yum` as the only front end before release 8.
const YUM_ERA: &[&str] = &["rhel", "centos", "ol"];

/// Broad distribution family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    DebianLike,
    RhelLike,
    Unsupported,
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DebianLike => write!(f, "debian-like"),
            Self::RhelLike => write!(f, "rhel-like"),
            Self::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Package-manager front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Apt,
    Dnf,
    Yum,
}

impl PackageManager {
    /// Executable name of the front end.
    #[must_use]
    pub const fn program(self) -> &'static str {
        match self {
            Self::Apt => "apt-get",
            Self::Dnf => "dnf",
            Self::Yum => "yum",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// The subset of `os-release` fields used for classification.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OsRelease {
    pub id: String,
    pub id_like: Vec<String>,
    pub version_id: Option<String>,
    pub pretty_name: Option<String>,
}

impl OsRelease {
    /// Parse `KEY=value` lines, unquoting values and lowercasing identifiers.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let fields: HashMap<&str, String> = content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .filter_map(|l| l.split_once('='))
            .map(|(k, v)| (k.trim(), unquote(v.trim())))
            .collect();

        Self {
            id: fields.get("ID").map(|s| s.to_lowercase()).unwrap_or_default(),
            id_like: fields
                .get("ID_LIKE")
                .map(|s| s.split_whitespace().map(str::to_lowercase).collect())
                .unwrap_or_default(),
            version_id: fields.get("VERSION_ID").cloned(),
            pretty_name: fields.get("PRETTY_NAME").cloned(),
        }
    }

    /// Major component of `VERSION_ID`, if numeric.
    #[must_use]
    pub fn major_version(&self) -> Option<u32> {
        self.version_id
            .as_deref()?
            .split('.')
            .next()?
            .parse()
            .ok()
    }
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value)
        .to_string()
}

/// Detected distribution and how to drive its package manager.
///
/// Built once at startup and never mutated afterwards; [`OsProfile::detect`]
/// never yields [`OsFamily::Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsProfile {
    pub family: OsFamily,
    /// The identifier that matched the allow-list.
    pub id: String,
    pub manager: PackageManager,
    /// Prefix package-manager calls with `sudo`.
    pub elevate: bool,
    pub pretty_name: Option<String>,
}

impl OsProfile {
    /// Detect the running distribution from [`OS_RELEASE`].
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingOsRelease`] if the file cannot be read
    /// and [`PlatformError::Unsupported`] if no identifier is allow-listed.
    pub fn detect() -> Result<Self, PlatformError> {
        Self::detect_from(Path::new(OS_RELEASE))
    }

    /// Detect the distribution from an arbitrary `os-release` file.
    ///
    /// # Errors
    ///
    /// See [`OsProfile::detect`].
    pub fn detect_from(path: &Path) -> Result<Self, PlatformError> {
        let content = fs::read_to_string(path).map_err(|source| PlatformError::MissingOsRelease {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_os_release(&OsRelease::parse(&content))
    }

    /// Classify parsed metadata. `ID` is tried first, then each `ID_LIKE` token.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::Unsupported`] when nothing matches.
    pub fn from_os_release(release: &OsRelease) -> Result<Self, PlatformError> {
        let candidates = std::iter::once(&release.id).chain(release.id_like.iter());
        for id in candidates {
            let manager = match classify(id) {
                OsFamily::DebianLike => PackageManager::Apt,
                OsFamily::RhelLike => {
                    let legacy = YUM_ERA.contains(&id.as_str())
                        && release.major_version().is_some_and(|v| v < 8);
                    if legacy {
                        PackageManager::Yum
                    } else {
                        PackageManager::Dnf
                    }
                }
                OsFamily::Unsupported => continue,
            };
            return Ok(Self {
                family: classify(id),
                id: id.clone(),
                manager,
                elevate: false,
                pretty_name: release.pretty_name.clone(),
            });
        }

        Err(PlatformError::Unsupported {
            id: if release.id.is_empty() {
                "<unknown>".to_string()
            } else {
                release.id.clone()
            },
        })
    }

    /// Return a copy that does or does not prefix commands with `sudo`.
    #[must_use]
    pub fn with_elevation(mut self, elevate: bool) -> Self {
        self.elevate = elevate;
        self
    }

    /// Command that installs a single package non-interactively.
    #[must_use]
    pub fn install_command(&self, package: &str) -> Invocation {
        self.manager_command(&["install", "-y", package])
    }

    /// Command that refreshes the package index.
    #[must_use]
    pub fn update_command(&self) -> Invocation {
        match self.manager {
            PackageManager::Apt => self.manager_command(&["update"]),
            PackageManager::Dnf | PackageManager::Yum => self.manager_command(&["makecache"]),
        }
    }

    fn manager_command(&self, args: &[&str]) -> Invocation {
        let program = self.manager.program();
        let apt = self.manager == PackageManager::Apt;
        if self.elevate {
            // sudo drops the caller's environment, so pass it as an argument
            let mut full: Vec<&str> = Vec::with_capacity(args.len() + 2);
            if apt {
                full.push("DEBIAN_FRONTEND=noninteractive");
            }
            full.push(program);
            full.extend_from_slice(args);
            Invocation::new("sudo", full)
        } else if apt {
            Invocation::new(program, args.iter().copied())
                .with_env("DEBIAN_FRONTEND", "noninteractive")
        } else {
            Invocation::new(program, args.iter().copied())
        }
    }
}

impl fmt::Display for OsProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.pretty_name.as_deref().unwrap_or(&self.id);
        write!(f, "{name} ({}, {})", self.family, self.manager)
    }
}

/// Map a single lowercase identifier to its family.
#[must_use]
pub fn classify(id: &str) -> OsFamily {
    if DEBIAN_LIKE.contains(&id) {
        OsFamily::DebianLike
    } else if RHEL_LIKE.contains(&id) {
        OsFamily::RhelLike
    } else {
        OsFamily::Unsupported
    }
}
