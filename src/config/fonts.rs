use serde::Deserialize;

/// A font file downloaded into the user font directory.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Font {
    /// File name on disk, e.g. `MesloLGS NF Regular.ttf`.
    pub file: String,
    pub url: String,
}
