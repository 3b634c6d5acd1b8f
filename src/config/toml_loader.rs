//! TOML manifest reading.
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Deserialize a TOML document, naming `origin` in any parse error.
///
/// # Errors
///
/// Returns an error if the content is not valid TOML for `T`.
pub fn parse<T: DeserializeOwned>(content: &str, origin: &str) -> Result<T> {
    toml::from_str(content).with_context(|| format!("Failed to parse TOML config: {origin}"))
}

/// Read and deserialize a TOML file.
///
/// Unlike the embedded manifest, a file named explicitly must exist.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&content, &path.display().to_string())
}
