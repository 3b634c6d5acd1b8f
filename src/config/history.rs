use serde::Deserialize;

/// Shell history policy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct History {
    /// `HISTSIZE` and `SAVEHIST`.
    #[serde(default = "default_size")]
    pub size: u32,
    /// Commands shorter than this stay out of the history file.
    #[serde(default = "default_min_length")]
    pub min_length: u32,
    /// Command names never written to the history file.
    #[serde(default)]
    pub ignore: Vec<String>,
}

const fn default_size() -> u32 {
    50_000
}

const fn default_min_length() -> u32 {
    4
}

impl Default for History {
    fn default() -> Self {
        Self {
            size: default_size(),
            min_length: default_min_length(),
            ignore: Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn empty_table_uses_defaults() {
        let h: History = toml::from_str("").unwrap();
        assert_eq!(h, History::default());
    }

    #[test]
    fn ignore_list_is_read() {
        let h: History = toml::from_str("min_length = 3\nignore = [\"ls\", \"cd\"]\n").unwrap();
        assert_eq!(h.min_length, 3);
        assert_eq!(h.ignore, vec!["ls", "cd"]);
    }
}
