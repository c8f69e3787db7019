//! MT-006: Input variables — var files, `NAME=VALUE` overrides, missing inputs.

use super::error::LoadError;
use super::types::Block;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// Variable values by name, in insertion order.
pub type VarValues = IndexMap<String, serde_yaml_ng::Value>;

/// Var file picked up automatically from the root module directory.
pub const DEFAULT_VAR_FILE: &str = "terraform.tfvars.yaml";

/// Suffix of additional var files loaded automatically, in name order.
pub const AUTO_VAR_FILE_SUFFIX: &str = ".auto.tfvars.yaml";

/// Attributes of a module block that configure the call itself rather than
/// passing an input to the called module.
const META_ARGUMENTS: &[&str] = &[
    "source",
    "version",
    "count",
    "for_each",
    "depends_on",
    "providers",
];

/// A declared `variable` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub default: Option<serde_yaml_ng::Value>,
}

/// Var files in `dir` that are loaded without being asked for: the default
/// file first, then `*.auto.tfvars.yaml` sorted by name.
pub fn discover_var_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let default = dir.join(DEFAULT_VAR_FILE);
    if default.is_file() {
        files.push(default);
    }

    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        AUTO_VAR_FILE_SUFFIX
    );
    if let Ok(paths) = glob::glob(&pattern) {
        let mut auto: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
        auto.sort();
        files.extend(auto);
    }
    files
}

/// Load a var file: a YAML mapping of variable name to value.
pub fn load_var_file(path: &Path) -> Result<VarValues, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(VarValues::new());
    }
    serde_yaml_ng::from_str(&content).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse a `NAME=VALUE` argument. The value is kept as a string.
pub fn parse_var_arg(arg: &str) -> Result<(String, String), LoadError> {
    match arg.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(LoadError::InvalidVarArg(arg.to_string())),
    }
}

/// Variables declared in `blocks`, in declaration order.
pub fn declared_variables<'a, I>(blocks: I) -> Vec<Variable>
where
    I: IntoIterator<Item = &'a Block>,
{
    blocks
        .into_iter()
        .filter(|b| b.is_variable())
        .filter_map(|b| {
            b.name().map(|name| Variable {
                name: name.to_string(),
                default: b.attributes.get("default").cloned(),
            })
        })
        .collect()
}

/// Values for every declared variable, plus the names that have neither a
/// provided value nor a default, in declaration order.
///
/// Provided values for undeclared names are ignored.
pub fn resolve_inputs(declared: &[Variable], provided: &VarValues) -> (VarValues, Vec<String>) {
    let mut values = VarValues::new();
    let mut missing = Vec::new();

    for var in declared {
        if let Some(v) = provided.get(&var.name) {
            values.insert(var.name.clone(), v.clone());
        } else if let Some(ref default) = var.default {
            values.insert(var.name.clone(), default.clone());
        } else {
            missing.push(var.name.clone());
        }
    }

    (values, missing)
}

/// Inputs a module block passes to the module it calls.
pub fn call_inputs(block: &Block) -> VarValues {
    block
        .attributes
        .iter()
        .filter(|(k, _)| !META_ARGUMENTS.contains(&k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}
