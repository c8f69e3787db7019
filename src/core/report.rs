//! MT-010: Rendering warnings and module trees for humans and machines.

use super::diagnostics::Warning;
use super::module::{ModuleId, ModuleTree};
use serde::Serialize;
use std::fmt::Write as _;

/// A warning together with the module that raised it.
#[derive(Debug, Serialize)]
pub struct WarningReport<'a> {
    /// Module address; empty for the root module.
    pub module: String,
    #[serde(flatten)]
    pub warning: &'a Warning,
}

/// Every warning in the tree, depth-first.
pub fn collect_warnings(tree: &ModuleTree) -> Vec<WarningReport<'_>> {
    tree.warnings()
        .map(|(id, warning)| WarningReport {
            module: tree.address(id),
            warning,
        })
        .collect()
}

/// Human-readable warning list. Empty string when there are no warnings.
pub fn render_warnings(tree: &ModuleTree) -> String {
    let mut out = String::new();
    for report in collect_warnings(tree) {
        let location = if report.module.is_empty() {
            "root module".to_string()
        } else {
            report.module.clone()
        };
        let _ = writeln!(out, "Warning: {} ({})", report.warning.title(), location);
        let _ = writeln!(out, "  {}", report.warning.friendly_message());
    }
    out
}

/// Warnings as a JSON array.
pub fn warnings_json(tree: &ModuleTree) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&collect_warnings(tree))
}

/// Indented tree of module instances.
///
/// ```text
/// root (.)
///   vpc[0] (./modules/vpc) [1 warning]
///   eks (terraform-aws-modules/eks/aws) remote
/// ```
pub fn render_tree(tree: &ModuleTree) -> String {
    let mut out = String::new();
    for id in tree.walk() {
        render_line(tree, id, &mut out);
    }
    out
}

fn render_line(tree: &ModuleTree, id: ModuleId, out: &mut String) {
    let m = tree.get(id);
    let indent = "  ".repeat(tree.depth(id));
    let mut line = format!("{}{} ({})", indent, m.name(), m.source);
    if let Some(ref suffix) = m.module_suffix {
        let _ = write!(line, " suffix={}", suffix);
    }
    if m.is_remote() {
        line.push_str(" remote");
    }
    if m.has_changes {
        line.push_str(" *");
    }
    match m.warnings().len() {
        0 => {}
        1 => line.push_str(" [1 warning]"),
        n => {
            let _ = write!(line, " [{} warnings]", n);
        }
    }
    let _ = writeln!(out, "{}", line);
}
