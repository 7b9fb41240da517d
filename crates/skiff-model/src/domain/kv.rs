use serde::{Deserialize, Serialize};

/// Single environment entry handed to a container.
///
/// Neither side is validated here; the control plane rejects names it cannot accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyValue {
    /// Variable name.
    key: String,
    /// Variable value.
    value: String,
}

impl KeyValue {
    /// Create a new entry.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the variable name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the variable value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Split into owned `(key, value)`.
    pub fn into_parts(self) -> (String, String) {
        (self.key, self.value)
    }
}

impl From<(&str, &str)> for KeyValue {
    fn from((key, value): (&str, &str)) -> Self {
        Self::new(key, value)
    }
}
