//! Declarative package and alternate-binary entries.
use serde::Deserialize;

/// A package to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    /// Canonical package name, tried first.
    pub name: String,
    /// Fallback package names, tried in order.
    #[serde(default)]
    pub alternates: Vec<String>,
    /// Abort the run if no name installs.
    #[serde(default)]
    pub required: bool,
    /// Executables that prove the package is present. Defaults to every name.
    #[serde(default)]
    pub binaries: Vec<String>,
}

impl PackageSpec {
    /// An optional package with no alternates.
    #[must_use]
    pub fn optional(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alternates: Vec::new(),
            required: false,
            binaries: Vec::new(),
        }
    }

    /// Package names in install order.
    pub fn candidates(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.alternates.iter().map(String::as_str))
    }

    /// Executables probed on PATH.
    #[must_use]
    pub fn probes(&self) -> Vec<&str> {
        if self.binaries.is_empty() {
            self.candidates().collect()
        } else {
            self.binaries.iter().map(String::as_str).collect()
        }
    }
}

/// A tool that some distributions ship under a different executable name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlternateBinary {
    /// The name the shell configuration expects (e.g. `bat`).
    pub binary: String,
    /// Packages that provide it, tried in order.
    pub packages: Vec<String>,
    /// The name the distribution may install instead (e.g. `batcat`).
    pub alternate_binary: String,
}

impl AlternateBinary {
    /// The optional package spec that installs this tool under either name.
    ///
    /// Returns `None` when no package is listed.
    #[must_use]
    pub fn package_spec(&self) -> Option<PackageSpec> {
        let (first, rest) = self.packages.split_first()?;
        Some(PackageSpec {
            name: first.clone(),
            alternates: rest.to_vec(),
            required: false,
            binaries: vec![self.binary.clone(), self.alternate_binary.clone()],
        })
    }
}
