use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize, Serializer};

use crate::ModelError;

/// Which backend variant a client implements.
///
/// - `Local`        — a local container engine reached over its HTTP API.
/// - `Orchestrator` — a cluster control plane managing pods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Local,
    Orchestrator,
}

impl BackendKind {
    /// Canonical type tag reported to callers and used as a metrics label.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => "DOCKER",
            BackendKind::Orchestrator => "KUBERNETES",
        }
    }
}

impl FromStr for BackendKind {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" | "local" => Ok(Self::Local),
            "kubernetes" | "kube" | "k8s" | "orchestrator" => Ok(Self::Orchestrator),
            _ => Err(ModelError::UnknownBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for BackendKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BackendKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_aliases_case_insensitive() {
        assert_eq!("docker".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!("DOCKER".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!(" local ".parse::<BackendKind>().unwrap(), BackendKind::Local);
        assert_eq!(
            "Kubernetes".parse::<BackendKind>().unwrap(),
            BackendKind::Orchestrator
        );
        assert_eq!("k8s".parse::<BackendKind>().unwrap(), BackendKind::Orchestrator);
    }

    #[test]
    fn rejects_unknown() {
        for bad in ["", "podman", "nomad"] {
            assert!(
                matches!(bad.parse::<BackendKind>(), Err(ModelError::UnknownBackend(_))),
                "expected UnknownBackend for {bad:?}"
            );
        }
    }

    #[test]
    fn serde_uses_canonical_tag() {
        let json = serde_json::to_string(&BackendKind::Orchestrator).unwrap();
        assert_eq!(json, r#""KUBERNETES""#);
        let back: BackendKind = serde_json::from_str(r#""docker""#).unwrap();
        assert_eq!(back, BackendKind::Local);
    }
}
