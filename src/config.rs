use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCfg {
    #[serde(default)]
    pub relnotes: RawRelnotesCfg,
}

/// The `[relnotes]` table of `.relnotes.toml`. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RawRelnotesCfg {
    pub title: Option<String>,
    pub from_latest_tag: bool,
    pub first_parent: Option<bool>,
    pub fetch_tags: Option<bool>,
    pub customer_notes: bool,
    pub outfile: Option<PathBuf>,
}
