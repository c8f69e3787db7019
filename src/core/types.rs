//! MT-001: Block and file schema types.
//!
//! Blocks are opaque to the module tree; this module gives them a concrete
//! YAML shape so projects can be loaded from disk:
//!
//! ```yaml
//! blocks:
//!   - type: variable
//!     labels: [region]
//!   - type: module
//!     labels: [vpc]
//!     attributes:
//!       source: ./modules/vpc
//!       count: 2
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// ============================================================================
// Blocks
// ============================================================================

/// A single syntax block (`variable`, `module`, `resource`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block type
    #[serde(rename = "type")]
    pub block_type: String,

    /// Block labels (e.g. the module or variable name)
    #[serde(default)]
    pub labels: Vec<String>,

    /// Attributes (order-preserving)
    #[serde(default)]
    pub attributes: IndexMap<String, serde_yaml_ng::Value>,
}

/// Shared handle to a block. Module calls and sibling instances point at the
/// same block without owning it.
pub type BlockRef = Arc<Block>;

/// Ordered block sequence of a module.
pub type Blocks = Vec<BlockRef>;

impl Block {
    pub fn new(block_type: &str, labels: &[&str]) -> Self {
        Self {
            block_type: block_type.to_string(),
            labels: labels.iter().map(|l| l.to_string()).collect(),
            attributes: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attr(mut self, key: &str, value: impl Into<serde_yaml_ng::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// First label, if any.
    pub fn name(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn is_module(&self) -> bool {
        self.block_type == "module"
    }

    pub fn is_variable(&self) -> bool {
        self.block_type == "variable"
    }

    /// String attribute, if present and a string.
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }
}

/// One `*.tf.yaml` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BlockFile {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

// ============================================================================
// Template helper
// ============================================================================

/// Convert a serde_yaml_ng::Value to a string for template resolution.
pub fn yaml_value_to_string(val: &serde_yaml_ng::Value) -> String {
    match val {
        serde_yaml_ng::Value::String(s) => s.clone(),
        serde_yaml_ng::Value::Number(n) => n.to_string(),
        serde_yaml_ng::Value::Bool(b) => b.to_string(),
        serde_yaml_ng::Value::Null => String::new(),
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{:?}", other)),
    }
}

// ============================================================================
// Tests
// ============================================================================
