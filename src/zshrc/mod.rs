//! Typed rendering of `~/.zshrc`.
//!
//! A [`ZshrcDocument`] takes an existing config (or the framework template),
//! pins the `ZSH_THEME` and `plugins=(...)` assignments, and appends a managed
//! section between [`MANAGED_BEGIN`] and [`MANAGED_END`]. Rendering a document
//! whose base already holds a managed section replaces that section, so
//! repeated runs converge on the same file.
mod blocks;

pub use blocks::{fallback_base, managed_blocks};

/// First line of the managed section.
pub const MANAGED_BEGIN: &str = "# >>> zsh-bootstrap managed block >>>";
/// Last line of the managed section.
pub const MANAGED_END: &str = "# <<< zsh-bootstrap managed block <<<";

/// A titled snippet inside the managed section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub title: String,
    pub body: String,
}

impl Block {
    #[must_use]
    pub fn new(title: &str, body: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            body: body.into(),
        }
    }
}

/// `~/.zshrc` as a base text plus the fields this tool owns.
#[derive(Debug, Clone)]
pub struct ZshrcDocument {
    base: String,
    framework_dir: Option<String>,
    custom_dir: Option<String>,
    theme: String,
    plugins: Vec<String>,
    blocks: Vec<Block>,
}

impl ZshrcDocument {
    /// Start from `base` with the given theme and no plugins or blocks.
    #[must_use]
    pub fn new(base: impl Into<String>, theme: &str) -> Self {
        Self {
            base: base.into(),
            framework_dir: None,
            custom_dir: None,
            theme: theme.to_string(),
            plugins: Vec::new(),
            blocks: Vec::new(),
        }
    }

    /// Rewrite an existing `export ZSH=` line to point at `dir`.
    #[must_use]
    pub fn framework_dir(mut self, dir: &str) -> Self {
        self.framework_dir = Some(dir.to_string());
        self
    }

    /// Pin `ZSH_CUSTOM` to `dir`, before the framework is sourced.
    #[must_use]
    pub fn custom_dir(mut self, dir: &str) -> Self {
        self.custom_dir = Some(dir.to_string());
        self
    }

    #[must_use]
    pub fn plugins<I, S>(mut self, plugins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.plugins = plugins.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    fn theme_line(&self) -> String {
        format!("ZSH_THEME=\"{}\"", self.theme)
    }

    fn plugins_line(&self) -> String {
        format!("plugins=({})", self.plugins.join(" "))
    }

    /// Render the final file contents.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut theme_done = false;
        let mut plugins_done = false;
        let mut custom_done = false;
        let mut lines = strip_managed(&self.base).into_iter();

        while let Some(line) = lines.next() {
            let trimmed = line.trim_start();
            if trimmed.starts_with("ZSH_THEME=") {
                if !theme_done {
                    out.push(self.theme_line());
                    theme_done = true;
                }
            } else if let Some(rest) = trimmed.strip_prefix("plugins=(") {
                if !rest.contains(')') {
                    // multi-line list: swallow through the closing paren,
                    // never past the framework source line
                    let ahead = lines.as_slice();
                    let close = ahead.iter().position(|l| l.contains(')'));
                    let source = ahead.iter().position(|l| is_framework_source(l));
                    let end = match (close, source) {
                        (Some(c), Some(s)) if s < c => s,
                        (Some(c), _) => c + 1,
                        (None, Some(s)) => s,
                        (None, None) => ahead.len(),
                    };
                    lines.by_ref().take(end).for_each(drop);
                }
                if !plugins_done {
                    out.push(self.plugins_line());
                    plugins_done = true;
                }
            } else if let Some(dir) = &self.framework_dir
                && trimmed.starts_with("export ZSH=")
            {
                out.push(format!("export ZSH=\"{dir}\""));
            } else if let Some(dir) = &self.custom_dir
                && (trimmed.starts_with("ZSH_CUSTOM=") || trimmed.starts_with("export ZSH_CUSTOM="))
            {
                if !custom_done {
                    out.push(custom_line(dir));
                    custom_done = true;
                }
            } else {
                out.push(line.to_string());
            }
        }

        let mut missing = Vec::new();
        if !theme_done {
            missing.push(self.theme_line());
        }
        if !plugins_done {
            missing.push(self.plugins_line());
        }
        if let Some(dir) = &self.custom_dir
            && !custom_done
        {
            missing.push(custom_line(dir));
        }
        if !missing.is_empty() {
            let at = out
                .iter()
                .position(|l| is_framework_source(l))
                .unwrap_or(0);
            out.splice(at..at, missing);
        }

        while out.last().is_some_and(|l| l.trim().is_empty()) {
            out.pop();
        }

        if !out.is_empty() {
            out.push(String::new());
        }
        out.push(MANAGED_BEGIN.to_string());
        for block in &self.blocks {
            out.push(format!("# {}", block.title));
            out.extend(block.body.trim_end().lines().map(String::from));
            out.push(String::new());
        }
        if self.blocks.is_empty() {
            out.push(String::new());
        }
        out.push(MANAGED_END.to_string());

        let mut text = out.join("\n");
        text.push('\n');
        text
    }
}

fn custom_line(dir: &str) -> String {
    format!("ZSH_CUSTOM=\"{dir}\"")
}

/// Whether `text` loads the framework's `oh-my-zsh.sh`.
#[must_use]
pub fn sources_framework(text: &str) -> bool {
    text.lines().any(is_framework_source)
}

fn is_framework_source(line: &str) -> bool {
    let t = line.trim_start();
    (t.starts_with("source ") || t.starts_with(". ")) && t.contains("oh-my-zsh.sh")
}

/// Lines of `base` with any managed section removed.
///
/// An unterminated section runs to the end of the file.
fn strip_managed(base: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut inside = false;
    for line in base.lines() {
        let t = line.trim();
        if inside {
            if t == MANAGED_END {
                inside = false;
            }
        } else if t == MANAGED_BEGIN {
            inside = true;
        } else {
            out.push(line);
        }
    }
    out
}
