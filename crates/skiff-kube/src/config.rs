use std::{env, path::PathBuf};

use serde::{Deserialize, Serialize};
use skiff_model::DEFAULT_NAMESPACE;

/// Environment variable naming the kubeconfig file.
pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Where the orchestrator's credentials live and which namespace pods go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    pub kubeconfig: PathBuf,
    pub namespace: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            kubeconfig: default_kubeconfig_path(dirs::home_dir()),
            namespace: DEFAULT_NAMESPACE.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// `KUBECONFIG` if set, else `$HOME/.kube/config`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`OrchestratorConfig::from_env`] over an arbitrary lookup.
    ///
    /// A list-valued `KUBECONFIG` uses its first entry.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_var = lookup(KUBECONFIG_ENV)
            .filter(|v| !v.trim().is_empty())
            .and_then(|v| env::split_paths(&v).find(|p| !p.as_os_str().is_empty()));

        match from_var {
            Some(kubeconfig) => Self {
                kubeconfig,
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

/// `<home>/.kube/config`, or a relative `.kube/config` when there is no home directory.
pub fn default_kubeconfig_path(home: Option<PathBuf>) -> PathBuf {
    home.unwrap_or_default().join(".kube").join("config")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn env_var_wins_over_home() {
        let cfg = OrchestratorConfig::from_lookup(|key| {
            (key == KUBECONFIG_ENV).then(|| "/etc/skiff/kubeconfig".to_string())
        });
        assert_eq!(cfg.kubeconfig, Path::new("/etc/skiff/kubeconfig"));
        assert_eq!(cfg.namespace, DEFAULT_NAMESPACE);
    }

    #[test]
    fn blank_env_var_falls_back_to_default() {
        let cfg = OrchestratorConfig::from_lookup(|_| Some("  ".to_string()));
        assert_eq!(cfg, OrchestratorConfig::default());
    }

    #[test]
    fn default_path_is_under_home() {
        let path = default_kubeconfig_path(Some(PathBuf::from("/home/ops")));
        assert_eq!(path, Path::new("/home/ops/.kube/config"));

        let path = default_kubeconfig_path(None);
        assert_eq!(path, Path::new(".kube/config"));
    }

    #[test]
    fn serde_partial_config() {
        let cfg: OrchestratorConfig = serde_json::from_str(r#"{"namespace":"browsers"}"#).unwrap();
        assert_eq!(cfg.namespace, "browsers");
        assert_eq!(cfg.kubeconfig, OrchestratorConfig::default().kubeconfig);
    }
}
