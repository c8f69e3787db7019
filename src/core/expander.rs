//! MT-008: Repetition expansion and placeholder substitution.
//!
//! A `module` block with `count` or `for_each` expands into one instance per
//! index or key, named `vpc[0]` / `vpc["a"]`. Block attributes may carry
//! `{{count.index}}`, `{{each.key}}`, `{{each.value}}` and `{{var.NAME}}`
//! placeholders. Unknown placeholders are left as written: a missing value is
//! reported as a warning elsewhere, never as an error here.

use super::error::LoadError;
use super::identity::{self, InstanceKey};
use super::types::{yaml_value_to_string, Block, BlockRef, Blocks};
use super::vars::VarValues;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Values visible to placeholders while expanding one set of blocks.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub count_index: Option<i64>,
    pub each: Option<(String, serde_yaml_ng::Value)>,
    pub vars: VarValues,
}

impl Scope {
    pub fn with_vars(vars: VarValues) -> Self {
        Self {
            vars,
            ..Self::default()
        }
    }

    fn lookup(&self, key: &str) -> Option<serde_yaml_ng::Value> {
        match key {
            "count.index" => self.count_index.map(serde_yaml_ng::Value::from),
            "each.key" => self
                .each
                .as_ref()
                .map(|(k, _)| serde_yaml_ng::Value::String(k.clone())),
            "each.value" => self.each.as_ref().map(|(_, v)| v.clone()),
            _ => key
                .strip_prefix("var.")
                .and_then(|name| self.vars.get(name))
                .cloned(),
        }
    }
}

/// One instance of a module call.
#[derive(Debug, Clone)]
pub struct Instance {
    /// Instance name, e.g. `vpc[1]`.
    pub name: String,
    pub key: Option<InstanceKey>,
    /// Scope for substituting the call block's attributes.
    pub scope: Scope,
}

/// Replace every known `{{...}}` placeholder in `template`.
pub fn substitute(template: &str, scope: &Scope) -> String {
    let mut result = template.to_string();
    let mut start = 0;

    while let Some(open) = result[start..].find("{{") {
        let open = start + open;
        let Some(close) = result[open..].find("}}") else {
            break;
        };
        let close = open + close + 2;
        let key = result[open + 2..close - 2].trim();

        match scope.lookup(key) {
            Some(value) => {
                let value = yaml_value_to_string(&value);
                result.replace_range(open..close, &value);
                start = open + value.len();
            }
            None => start = close,
        }
    }

    result
}

/// Substitute placeholders inside a YAML value.
///
/// A string that is exactly one known placeholder takes the referenced
/// value with its own type, so `count: "{{var.n}}"` stays a number.
pub fn substitute_value(value: &serde_yaml_ng::Value, scope: &Scope) -> serde_yaml_ng::Value {
    use serde_yaml_ng::Value;
    match value {
        Value::String(s) => {
            if let Some(inner) = s
                .trim()
                .strip_prefix("{{")
                .and_then(|r| r.strip_suffix("}}"))
            {
                if !inner.contains("{{") && !inner.contains("}}") {
                    if let Some(v) = scope.lookup(inner.trim()) {
                        return v;
                    }
                }
            }
            Value::String(substitute(s, scope))
        }
        Value::Sequence(items) => {
            Value::Sequence(items.iter().map(|v| substitute_value(v, scope)).collect())
        }
        Value::Mapping(map) => Value::Mapping(
            map.iter()
                .map(|(k, v)| (k.clone(), substitute_value(v, scope)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A copy of `block` with placeholders in its attributes substituted.
pub fn expand_block(block: &Block, scope: &Scope) -> Block {
    Block {
        block_type: block.block_type.clone(),
        labels: block.labels.clone(),
        attributes: block
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), substitute_value(v, scope)))
            .collect(),
    }
}

/// Expand `raw` for one module instance. `raw` is only read; blocks that come
/// out unchanged are shared rather than copied.
pub fn expand_blocks(raw: &[BlockRef], scope: &Scope) -> Blocks {
    raw.iter()
        .map(|block| {
            let expanded = expand_block(block, scope);
            if expanded == **block {
                Arc::clone(block)
            } else {
                Arc::new(expanded)
            }
        })
        .collect()
}

/// Instances of a `module` block.
///
/// Without `count` or `for_each` there is one instance named after the
/// block label. `for_each` instances are ordered by key.
///
/// A `count` or `for_each` that still holds an unresolved placeholder (its
/// variable had no value) is treated as absent: the call gets the single
/// unrepeated instance and the missing value surfaces as a warning.
pub fn expand_call(block: &Block) -> Result<Vec<Instance>, LoadError> {
    let base = block.name().unwrap_or_default().to_string();

    let unresolved = ["count", "for_each"]
        .iter()
        .filter_map(|attr| block.attributes.get(*attr))
        .any(has_placeholder);
    if unresolved {
        return Ok(vec![single_instance(base)]);
    }

    if let Some(count) = block.attributes.get("count") {
        let n = count_value(count).ok_or_else(|| LoadError::InvalidRepetition {
            call: base.clone(),
            reason: format!(
                "count must be a non-negative integer, got {}",
                yaml_value_to_string(count)
            ),
        })?;
        return Ok((0..n)
            .map(|i| {
                let key = InstanceKey::Index(i);
                Instance {
                    name: identity::instance_name(&base, &key),
                    key: Some(key),
                    scope: Scope {
                        count_index: Some(i),
                        ..Scope::default()
                    },
                }
            })
            .collect());
    }

    if let Some(for_each) = block.attributes.get("for_each") {
        let entries = each_entries(for_each).map_err(|reason| LoadError::InvalidRepetition {
            call: base.clone(),
            reason,
        })?;
        return Ok(entries
            .into_iter()
            .map(|(k, v)| {
                let key = InstanceKey::Key(k.clone());
                Instance {
                    name: identity::instance_name(&base, &key),
                    key: Some(key),
                    scope: Scope {
                        each: Some((k, v)),
                        ..Scope::default()
                    },
                }
            })
            .collect());
    }

    Ok(vec![single_instance(base)])
}

fn single_instance(name: String) -> Instance {
    Instance {
        name,
        key: None,
        scope: Scope::default(),
    }
}

fn has_placeholder(value: &serde_yaml_ng::Value) -> bool {
    use serde_yaml_ng::Value;
    match value {
        Value::String(s) => s
            .find("{{")
            .is_some_and(|open| s[open..].contains("}}")),
        Value::Sequence(items) => items.iter().any(has_placeholder),
        Value::Mapping(map) => map
            .iter()
            .any(|(k, v)| has_placeholder(k) || has_placeholder(v)),
        _ => false,
    }
}

fn count_value(value: &serde_yaml_ng::Value) -> Option<i64> {
    let n = match value {
        serde_yaml_ng::Value::Number(n) => n.as_i64()?,
        serde_yaml_ng::Value::String(s) => s.trim().parse().ok()?,
        _ => return None,
    };
    (n >= 0).then_some(n)
}

/// Keyed entries of a `for_each` value. List items are deduplicated; two
/// mapping keys that render to the same string (`1` and `"1"`) are an error.
fn each_entries(
    value: &serde_yaml_ng::Value,
) -> Result<BTreeMap<String, serde_yaml_ng::Value>, String> {
    use serde_yaml_ng::Value;
    let mut entries = BTreeMap::new();
    match value {
        Value::Sequence(items) => {
            for item in items {
                let key = scalar_key(item)?;
                entries.entry(key).or_insert_with(|| item.clone());
            }
        }
        Value::Mapping(map) => {
            for (k, v) in map {
                let key = scalar_key(k)?;
                if entries.insert(key.clone(), v.clone()).is_some() {
                    return Err(format!("for_each key {:?} appears more than once", key));
                }
            }
        }
        other => {
            return Err(format!(
                "for_each must be a list of strings or a mapping, got {}",
                yaml_value_to_string(other)
            ))
        }
    }
    Ok(entries)
}

fn scalar_key(value: &serde_yaml_ng::Value) -> Result<String, String> {
    use serde_yaml_ng::Value;
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(_) | Value::Bool(_) => Ok(yaml_value_to_string(value)),
        other => Err(format!(
            "for_each keys must be strings, numbers or booleans, got {}",
            yaml_value_to_string(other)
        )),
    }
}
