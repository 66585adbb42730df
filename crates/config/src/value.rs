//! Generic configuration value tree.
//!
//! Responsibilities:
//! - Represent loaded documents as a tagged union of scalars, sequences,
//!   and mappings.
//! - Provide dotted-key lookup into nested mappings.
//! - Provide a non-destructive deep merge for layered documents.
//!
//! Invariants:
//! - Lookup of an absent key returns `None`, which is distinct from a
//!   stored `Value::Null`.
//! - Merging replaces leaf values from later documents but preserves
//!   sibling keys under a shared mapping parent.

use std::collections::BTreeMap;
use std::fmt;

/// A configuration value: scalar, sequence, or nested mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(BTreeMap<String, Value>),
}

impl Value {
    /// An empty mapping, used as the fallback for missing documents.
    pub fn empty_mapping() -> Self {
        Self::Mapping(BTreeMap::new())
    }

    /// Look up a dot-separated key path into nested mappings.
    ///
    /// Returns `None` when any segment is absent or a non-mapping value is
    /// traversed; a stored null yields `Some(&Value::Null)`.
    pub fn pointer(&self, dotted_key: &str) -> Option<&Self> {
        let mut current = self;
        for segment in dotted_key.split('.') {
            match current {
                Self::Mapping(map) => current = map.get(segment)?,
                _ => return None,
            }
        }
        Some(current)
    }

    /// Merge `overlay` into `self`.
    ///
    /// Mappings merge key-wise; everything else (scalars, sequences, and
    /// mismatched kinds) is replaced by the overlay wholesale.
    pub fn merge_from(&mut self, overlay: Self) {
        match (self, overlay) {
            (Self::Mapping(base), Self::Mapping(over)) => {
                for (key, value) in over {
                    match base.get_mut(&key) {
                        Some(slot) => slot.merge_from(value),
                        None => {
                            base.insert(key, value);
                        }
                    }
                }
            }
            (slot, over) => *slot = over,
        }
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric accessor; integers widen to `f64`.
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    pub const fn as_mapping(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }
}

impl From<serde_yaml::Value> for Value {
    fn from(raw: serde_yaml::Value) -> Self {
        use serde_yaml::Value as Yaml;
        match raw {
            Yaml::Null => Self::Null,
            Yaml::Bool(b) => Self::Bool(b),
            Yaml::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Yaml::String(s) => Self::String(s),
            Yaml::Sequence(seq) => Self::Sequence(seq.into_iter().map(Self::from).collect()),
            Yaml::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (key, value) in map {
                    // Scalar keys are stringified; structured keys have no
                    // dotted-lookup representation and are dropped.
                    let key = match key {
                        Yaml::String(s) => s,
                        Yaml::Number(n) => n.to_string(),
                        Yaml::Bool(b) => b.to_string(),
                        _ => continue,
                    };
                    out.insert(key, Self::from(value));
                }
                Self::Mapping(out)
            }
            Yaml::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Int(n) => Self::from(*n),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(Self::Number)
                .unwrap_or(Self::Null),
            Value::String(s) => Self::String(s.clone()),
            Value::Sequence(seq) => Self::Array(seq.iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "{s}"),
            other => write!(f, "{}", serde_json::Value::from(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(doc: &str) -> Value {
        let raw: serde_yaml::Value = serde_yaml::from_str(doc).unwrap();
        Value::from(raw)
    }

    #[test]
    fn test_pointer_walks_nested_mappings() {
        let v = yaml("database:\n  host: localhost\n  port: 3306\n");
        assert_eq!(
            v.pointer("database.host").and_then(Value::as_str),
            Some("localhost")
        );
        assert_eq!(
            v.pointer("database.port").and_then(Value::as_i64),
            Some(3306)
        );
        assert!(v.pointer("database.missing").is_none());
        assert!(v.pointer("nope.host").is_none());
    }

    #[test]
    fn test_pointer_distinguishes_stored_null_from_absent() {
        let v = yaml("a:\n  b: null\n");
        assert_eq!(v.pointer("a.b"), Some(&Value::Null));
        assert!(v.pointer("a.c").is_none());
    }

    #[test]
    fn test_merge_preserves_sibling_keys() {
        let mut base = yaml("a:\n  x: 1\n");
        base.merge_from(yaml("a:\n  y: 2\n"));
        assert_eq!(base.pointer("a.x").and_then(Value::as_i64), Some(1));
        assert_eq!(base.pointer("a.y").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn test_merge_overrides_leaf_at_same_path() {
        let mut base = yaml("a:\n  x: 1\n  y: old\n");
        base.merge_from(yaml("a:\n  y: new\n"));
        assert_eq!(base.pointer("a.x").and_then(Value::as_i64), Some(1));
        assert_eq!(
            base.pointer("a.y").and_then(Value::as_str),
            Some("new")
        );
    }

    #[test]
    fn test_merge_replaces_sequences_wholesale() {
        let mut base = yaml("names: [a, b, c]\n");
        base.merge_from(yaml("names: [d]\n"));
        assert_eq!(
            base.pointer("names").and_then(Value::as_sequence).map(<[Value]>::len),
            Some(1)
        );
    }

    #[test]
    fn test_yaml_numbers_map_to_int_and_float() {
        let v = yaml("i: 42\nf: 3.5\n");
        assert_eq!(v.pointer("i"), Some(&Value::Int(42)));
        assert_eq!(v.pointer("f"), Some(&Value::Float(3.5)));
    }
}
