//! Bootstrap manifest: what to install and how to render `~/.zshrc`.
pub mod fonts;
pub mod history;
pub mod packages;
pub mod shell;
pub mod toml_loader;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use fonts::Font;
use history::History;
use packages::{AlternateBinary, PackageSpec};
use shell::{Framework, JumpTool, Plugin, Theme};

/// Environment variable naming a manifest that replaces the embedded one.
pub const CONFIG_ENV: &str = "ZSH_BOOTSTRAP_CONFIG";

const EMBEDDED: &str = include_str!("../../conf/bootstrap.toml");

/// The full manifest.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub packages: Vec<PackageSpec>,
    #[serde(default)]
    pub alternates: Vec<AlternateBinary>,
    pub framework: Framework,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub plugins: Vec<Plugin>,
    #[serde(default)]
    pub fonts: Vec<Font>,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub jump: Option<JumpTool>,
}

impl Config {
    /// Load the manifest named by [`CONFIG_ENV`], or the embedded default.
    ///
    /// # Errors
    ///
    /// Returns an error if the override cannot be read or either manifest
    /// fails to parse.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_path(&PathBuf::from(path)),
            _ => Self::embedded(),
        }
    }

    /// Parse the manifest compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded manifest is malformed.
    pub fn embedded() -> Result<Self> {
        toml_loader::parse(EMBEDDED, "embedded bootstrap.toml")
    }

    /// Load a manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: &Path) -> Result<Self> {
        toml_loader::load_file(path).context("loading bootstrap manifest")
    }

    /// Check the manifest for suspicious entries.
    #[must_use]
    pub fn validate(&self) -> Vec<validation::ValidationWarning> {
        validation::validate_all(self)
    }
}
