//! Core module-tree logic — identity, diagnostics, tree, loading, reporting.

pub mod diagnostics;
pub mod error;
pub mod expander;
pub mod identity;
pub mod loader;
pub mod module;
pub mod parser;
pub mod report;
pub mod types;
pub mod vars;

pub use diagnostics::{new_missing_vars_warning, Warning, WarningCode, WarningData};
pub use error::LoadError;
pub use module::{Module, ModuleCall, ModuleId, ModuleTree};
