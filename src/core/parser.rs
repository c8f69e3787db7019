//! MT-005: Block file parsing and validation.
//!
//! Reads `*.tf.yaml` block files and validates structural constraints:
//! - module blocks have exactly one label and a string `source`
//! - `count` and `for_each` are mutually exclusive
//! - variable blocks have exactly one label
//! - module and variable names are unique within a module

use super::error::LoadError;
use super::types::{Block, BlockFile, BlockRef};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File suffix of block files within a module directory.
pub const BLOCK_FILE_SUFFIX: &str = ".tf.yaml";

/// Validation error.
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Parse a block file from a string.
pub fn parse_blocks(yaml: &str) -> Result<Vec<Block>, serde_yaml_ng::Error> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: BlockFile = serde_yaml_ng::from_str(yaml)?;
    Ok(file.blocks)
}

/// Parse a block file from disk.
pub fn parse_block_file(path: &Path) -> Result<Vec<Block>, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_blocks(&content).map_err(|source| LoadError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}

/// Block files of a module directory, sorted by file name.
pub fn block_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let pattern = format!(
        "{}/*{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        BLOCK_FILE_SUFFIX
    );
    let paths = glob::glob(&pattern).map_err(|e| LoadError::Io {
        path: dir.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, e.msg),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| LoadError::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load and validate all blocks of the module in `dir`, in file order.
pub fn load_module_blocks(dir: &Path) -> Result<Arc<[BlockRef]>, LoadError> {
    let mut blocks = Vec::new();
    for file in block_files(dir)? {
        blocks.extend(parse_block_file(&file)?);
    }

    let errors = validate_blocks(&blocks);
    if !errors.is_empty() {
        return Err(LoadError::Validation {
            path: dir.to_path_buf(),
            messages: errors.into_iter().map(|e| e.message).collect(),
        });
    }

    Ok(blocks.into_iter().map(Arc::new).collect())
}

/// Validate the blocks of one module. Returns a list of errors (empty = valid).
pub fn validate_blocks(blocks: &[Block]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut module_names = HashSet::new();
    let mut variable_names = HashSet::new();

    for block in blocks {
        if block.is_module() {
            if block.labels.len() != 1 {
                errors.push(ValidationError {
                    message: format!(
                        "module block must have exactly one label, got {}",
                        block.labels.len()
                    ),
                });
                continue;
            }
            let name = &block.labels[0];
            if !module_names.insert(name.clone()) {
                errors.push(ValidationError {
                    message: format!("duplicate module '{}'", name),
                });
            }
            match block.attributes.get("source") {
                None => errors.push(ValidationError {
                    message: format!("module '{}' has no source", name),
                }),
                Some(v) if v.as_str().is_none_or(str::is_empty) => {
                    errors.push(ValidationError {
                        message: format!("module '{}' source must be a non-empty string", name),
                    })
                }
                Some(_) => {}
            }
            if block.attributes.contains_key("count") && block.attributes.contains_key("for_each")
            {
                errors.push(ValidationError {
                    message: format!("module '{}' sets both count and for_each", name),
                });
            }
        } else if block.is_variable() {
            if block.labels.len() != 1 {
                errors.push(ValidationError {
                    message: format!(
                        "variable block must have exactly one label, got {}",
                        block.labels.len()
                    ),
                });
                continue;
            }
            if !variable_names.insert(block.labels[0].clone()) {
                errors.push(ValidationError {
                    message: format!("duplicate variable '{}'", block.labels[0]),
                });
            }
        }
    }

    errors
}
