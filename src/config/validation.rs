use std::collections::HashSet;

use super::Config;
use super::fonts::Font;
use super::packages::{AlternateBinary, PackageSpec};
use super::shell::Plugin;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The manifest section (e.g., "packages", "plugins").
    pub source: String,
    /// The specific item that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for manifest section validators.
pub trait ConfigValidator {
    /// Validate the section and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;

    /// Name of the section this validator checks.
    fn name(&self) -> &'static str;
}

fn looks_like_url(s: &str) -> bool {
    s.starts_with("https://") || s.starts_with("http://")
}

/// Validator for `[[packages]]` and `[[alternates]]`.
#[derive(Debug)]
pub struct PackageValidator<'a> {
    packages: &'a [PackageSpec],
    alternates: &'a [AlternateBinary],
}

impl<'a> PackageValidator<'a> {
    #[must_use]
    pub const fn new(packages: &'a [PackageSpec], alternates: &'a [AlternateBinary]) -> Self {
        Self {
            packages,
            alternates,
        }
    }
}

impl ConfigValidator for PackageValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for package in self.packages {
            if package.name.trim().is_empty() {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &package.name,
                    "package name is empty",
                ));
            }
            if !seen.insert(package.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &package.name,
                    "package listed more than once",
                ));
            }
        }

        if !self.packages.iter().any(|p| p.name == "zsh") {
            warnings.push(ValidationWarning::new(
                self.name(),
                "zsh",
                "zsh is not in the package list; it must already be installed",
            ));
        }

        for alt in self.alternates {
            if alt.packages.is_empty() {
                warnings.push(ValidationWarning::new(
                    "alternates",
                    &alt.binary,
                    "no package listed; only an existing install can be linked",
                ));
            }
            if alt.binary == alt.alternate_binary {
                warnings.push(ValidationWarning::new(
                    "alternates",
                    &alt.binary,
                    "alternate_binary is the same as binary",
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "packages"
    }
}

/// Validator for `[[plugins]]`.
#[derive(Debug)]
pub struct PluginValidator<'a> {
    plugins: &'a [Plugin],
}

impl<'a> PluginValidator<'a> {
    #[must_use]
    pub const fn new(plugins: &'a [Plugin]) -> Self {
        Self { plugins }
    }
}

impl ConfigValidator for PluginValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for plugin in self.plugins {
            if plugin.name.is_empty() || plugin.name.contains(char::is_whitespace) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &plugin.name,
                    "plugin name must be a single word",
                ));
            }
            if !seen.insert(plugin.name.as_str()) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &plugin.name,
                    "plugin listed more than once",
                ));
            }
            if let Some(url) = &plugin.url
                && !looks_like_url(url)
            {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &plugin.name,
                    format!("clone url is not http(s): {url}"),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "plugins"
    }
}

/// Validator for `[[fonts]]`.
#[derive(Debug)]
pub struct FontValidator<'a> {
    fonts: &'a [Font],
}

impl<'a> FontValidator<'a> {
    #[must_use]
    pub const fn new(fonts: &'a [Font]) -> Self {
        Self { fonts }
    }
}

impl ConfigValidator for FontValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for font in self.fonts {
            if font.file.contains('/') || font.file == ".." || font.file.is_empty() {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &font.file,
                    "font file must be a plain file name",
                ));
            }
            if !looks_like_url(&font.url) {
                warnings.push(ValidationWarning::new(
                    self.name(),
                    &font.file,
                    format!("download url is not http(s): {}", font.url),
                ));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "fonts"
    }
}

/// Run every validator over `config`.
#[must_use]
pub fn validate_all(config: &Config) -> Vec<ValidationWarning> {
    let validators: Vec<Box<dyn ConfigValidator + '_>> = vec![
        Box::new(PackageValidator::new(&config.packages, &config.alternates)),
        Box::new(PluginValidator::new(&config.plugins)),
        Box::new(FontValidator::new(&config.fonts)),
    ];
    validators.iter().flat_map(|v| v.validate()).collect()
}
