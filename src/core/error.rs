//! MT-007: Fatal load errors.
//!
//! Anything here aborts tree construction. Recoverable problems are
//! [`Warning`](super::diagnostics::Warning)s instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML parse error in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml_ng::Error,
    },

    #[error("invalid blocks in {}: {}", path.display(), messages.join("; "))]
    Validation { path: PathBuf, messages: Vec<String> },

    #[error("module '{call}' source '{source_path}' not found (looked in {})", resolved.display())]
    ModuleNotFound {
        call: String,
        source_path: String,
        resolved: PathBuf,
    },

    #[error("module '{call}' calls {} which is already being loaded", path.display())]
    ModuleCycle { call: String, path: PathBuf },

    #[error("module '{call}': {reason}")]
    InvalidRepetition { call: String, reason: String },

    #[error("module '{parent}' already has a child named '{name}'")]
    DuplicateModule { parent: String, name: String },

    #[error("invalid variable argument '{0}': expected NAME=VALUE")]
    InvalidVarArg(String),
}
