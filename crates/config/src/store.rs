//! Immutable-after-load merged document store.
//!
//! A `ConfigStore` is assembled by merging zero or more documents in load
//! order: later documents' leaf values override earlier ones at the same
//! key path, while sibling keys under a shared parent are preserved.

use crate::value::Value;

/// A merged, read-only view over one or more loaded documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    root: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            root: Value::empty_mapping(),
        }
    }
}

impl ConfigStore {
    /// Merge `documents` in order into a single store.
    pub fn from_documents<I>(documents: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        let mut root = Value::empty_mapping();
        for document in documents {
            root.merge_from(document);
        }
        Self { root }
    }

    /// Dotted-key lookup into the merged tree.
    pub fn get(&self, dotted_key: &str) -> Option<&Value> {
        self.root.pointer(dotted_key)
    }

    /// The merged root value.
    pub const fn root(&self) -> &Value {
        &self.root
    }
}
