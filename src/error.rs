use std::{path::PathBuf, result::Result as StdResult};

use thiserror::Error;

pub type Result<T> = StdResult<T, Error>;

/// An enum for describing and handling the errors encountered while
/// retrieving history or writing release notes.
///
/// Parsing and rendering never fail; every variant here comes from the
/// configuration layer or from the `git` subprocess.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config file not found: {0}")]
    ConfigMissing(PathBuf),

    #[error("cannot get current directory")]
    CurrentDir,

    #[error("fatal I/O error")]
    Io(#[from] std::io::Error),

    #[error("`git {command}` failed: {stderr}")]
    Git { command: String, stderr: String },

    #[error("tag or commit '{0}' does not exist in the repository")]
    UnknownRevision(String),
}
