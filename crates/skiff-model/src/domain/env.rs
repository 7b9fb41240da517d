use serde::{Deserialize, Serialize};

use crate::KeyValue;

/// Ordered environment for a container template.
///
/// Serialized as a plain array; later entries shadow earlier ones with the same key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Env(pub Vec<KeyValue>);

impl Env {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append an entry.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.0.push(KeyValue::new(key, value));
    }

    /// Value for `key`, resolving shadowed entries to the last one pushed.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|kv| kv.key() == key)
            .map(|kv| kv.value())
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeyValue> {
        self.0.iter()
    }

    /// Collapse shadowed keys, keeping first-seen order and last-pushed values.
    ///
    /// The control plane rejects duplicate names in a container env, so this is what gets submitted.
    pub fn resolved(&self) -> Vec<KeyValue> {
        let mut out: Vec<KeyValue> = Vec::with_capacity(self.0.len());
        for kv in &self.0 {
            match out.iter_mut().find(|e| e.key() == kv.key()) {
                Some(slot) => *slot = kv.clone(),
                None => out.push(kv.clone()),
            }
        }
        out
    }
}

impl FromIterator<(String, String)> for Env {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| KeyValue::new(k, v)).collect())
    }
}
