//! Framework, theme, plugin and directory-jump tool settings.
use serde::Deserialize;

/// The oh-my-zsh framework.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Framework {
    /// Upstream installer script.
    pub installer_url: String,
    /// Theme used when the configured theme is unavailable.
    #[serde(default = "default_theme")]
    pub default_theme: String,
    /// `zstyle ':omz:update' mode` value.
    #[serde(default = "default_update_mode")]
    pub update_mode: String,
    /// `zstyle ':omz:update' frequency` in days.
    #[serde(default = "default_update_frequency")]
    pub update_frequency: u32,
}

fn default_theme() -> String {
    "robbyrussell".to_string()
}

fn default_update_mode() -> String {
    "auto".to_string()
}

const fn default_update_frequency() -> u32 {
    13
}

/// A theme cloned into `$ZSH_CUSTOM/themes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    /// Value written to `ZSH_THEME`, e.g. `powerlevel10k/powerlevel10k`.
    pub name: String,
    /// Git URL to clone.
    pub url: String,
}

impl Theme {
    /// Directory name under `$ZSH_CUSTOM/themes`.
    #[must_use]
    pub fn checkout_dir(&self) -> &str {
        self.name.split('/').next().unwrap_or(&self.name)
    }
}

/// A plugin enabled in `plugins=(...)`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Plugin {
    pub name: String,
    /// Git URL to clone into `$ZSH_CUSTOM/plugins`; bundled plugins have none.
    #[serde(default)]
    pub url: Option<String>,
}

/// Directory-jump tool installed by its own script.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JumpTool {
    /// Executable name, also used for the shell hook.
    pub binary: String,
    pub installer_url: String,
}
