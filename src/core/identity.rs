//! MT-002: Instance identity — counted (`name[0]`) and keyed (`name["a"]`) suffixes.
//!
//! A module produced by `count` carries its integer index in its name, one
//! produced by `for_each` carries its string key. The two patterns are
//! mutually exclusive: the counted form needs a digit before the closing `]`,
//! the keyed form a `"`. When both are checked, counted wins.
//!
//! Rendering a key escapes only `"` and `\`; reading one back decodes just
//! those two escapes, so every rendered key reads back unchanged and any
//! other backslash is kept as written.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

/// Trailing `[N]`. Compiled once; `Regex` is stateless and safe to share.
static COUNT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*)\[(\d+)\]$").expect("count pattern is valid"));

/// Trailing `["key"]`.
static EACH_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^(.*)\["(.*)"\]$"#).expect("for_each pattern is valid"));

/// The repetition address of a module instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InstanceKey {
    /// Produced by `count`.
    Index(i64),
    /// Produced by `for_each`.
    Key(String),
}

impl fmt::Display for InstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "[{}]", i),
            Self::Key(k) => {
                f.write_str("[\"")?;
                for c in k.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"]")
            }
        }
    }
}

/// Count index encoded in `name`, or `None` when the name has no `[N]` suffix.
///
/// A numeral too large for `i64` is treated as absent.
pub fn instance_index(name: &str) -> Option<i64> {
    let caps = COUNT_SUFFIX.captures(name)?;
    caps.get(2)?.as_str().parse().ok()
}

/// `for_each` key encoded in `name`, or `None` when the name has no `["k"]` suffix.
///
/// `\"` and `\\` are decoded; keys without them are borrowed.
pub fn instance_key(name: &str) -> Option<Cow<'_, str>> {
    let raw = EACH_SUFFIX.captures(name)?.get(2)?.as_str();
    if !raw.contains("\\\"") && !raw.contains("\\\\") {
        return Some(Cow::Borrowed(raw));
    }
    let mut key = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek().filter(|&&n| n == '"' || n == '\\') {
                key.push(next);
                chars.next();
                continue;
            }
        }
        key.push(c);
    }
    Some(Cow::Owned(key))
}

/// Repetition address of `name`. Counted suffixes take precedence.
pub fn instance(name: &str) -> Option<InstanceKey> {
    instance_index(name)
        .map(InstanceKey::Index)
        .or_else(|| instance_key(name).map(|k| InstanceKey::Key(k.into_owned())))
}

/// `name` with any trailing repetition suffix removed.
pub fn base_name(name: &str) -> &str {
    let caps = COUNT_SUFFIX
        .captures(name)
        .or_else(|| EACH_SUFFIX.captures(name));
    match caps.and_then(|c| c.get(1)) {
        Some(base) => base.as_str(),
        None => name,
    }
}

/// Build the instance name for `base` addressed by `key`.
pub fn instance_name(base: &str, key: &InstanceKey) -> String {
    format!("{}{}", base, key)
}
