//! MT-003: Non-fatal diagnostics raised while building a module tree.
//!
//! A [`Warning`] is built only through a per-code factory so that its
//! friendly message always agrees with its payload. Warnings are immutable
//! once built and are appended to the module that raised them.

use serde::Serialize;
use std::fmt;

/// Stable warning codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum WarningCode {
    MissingVars,
}

impl WarningCode {
    /// Numeric code, stable across releases.
    pub fn as_u16(self) -> u16 {
        match self {
            Self::MissingVars => 1,
        }
    }
}

impl fmt::Display for WarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingVars => write!(f, "missing_vars"),
        }
    }
}

/// Code-specific payload. One variant per [`WarningCode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", content = "data", rename_all = "snake_case")]
#[non_exhaustive]
pub enum WarningData {
    /// Variables with no value in the evaluation context, in the order given.
    MissingVars(Vec<String>),
}

impl WarningData {
    pub fn code(&self) -> WarningCode {
        match self {
            Self::MissingVars(_) => WarningCode::MissingVars,
        }
    }
}

/// A recoverable problem found during module evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Warning {
    title: String,
    #[serde(flatten)]
    data: WarningData,
    friendly_message: String,
}

impl Warning {
    /// Warning for Terraform variables that have no input value.
    ///
    /// `vars` is kept as given: duplicates and ordering are not touched.
    pub fn missing_vars(vars: Vec<String>) -> Self {
        let friendly_message = format!(
            "Input values were not provided for following Terraform variables: {}. {}",
            join_quoted(&vars),
            "Use --terraform-var-file or --terraform-var to specify them.",
        );
        Self {
            title: "Missing Terraform vars".to_string(),
            data: WarningData::MissingVars(vars),
            friendly_message,
        }
    }

    pub fn code(&self) -> WarningCode {
        self.data.code()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn data(&self) -> &WarningData {
        &self.data
    }

    /// Message for display to a CLI user.
    pub fn friendly_message(&self) -> &str {
        &self.friendly_message
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.friendly_message)
    }
}

/// Shorthand for [`Warning::missing_vars`].
pub fn new_missing_vars_warning<I, S>(vars: I) -> Warning
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Warning::missing_vars(vars.into_iter().map(Into::into).collect())
}

/// `"a", "b"`: each element double-quoted with escapes, joined by `", "`.
fn join_quoted(elems: &[String]) -> String {
    elems
        .iter()
        .map(|e| format!("{:?}", e))
        .collect::<Vec<_>>()
        .join(", ")
}
