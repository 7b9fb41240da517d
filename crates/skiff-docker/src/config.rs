use serde::{Deserialize, Serialize};
use skiff_core::VersionBounds;
use skiff_model::ApiVersion;

use crate::sdk::sdk_default_version;

/// Environment variable naming the engine endpoint (`unix://...`, `tcp://...`).
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Environment variable pinning the Engine API version and disabling negotiation.
pub const DOCKER_API_VERSION_ENV: &str = "DOCKER_API_VERSION";

/// Oldest Engine API version the downgrade search tries by default.
pub const MIN_API_VERSION: ApiVersion = ApiVersion::new(1, 24);

/// Connection and negotiation settings for the local engine.
///
/// Read once (usually via [`LocalEngineConfig::from_env`]) and handed to the factory;
/// nothing downstream consults the process environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalEngineConfig {
    /// Engine endpoint. `None` means the platform's default socket.
    pub host: Option<String>,
    /// Explicit API version override. When set, no probing happens.
    pub api_version: Option<String>,
    /// Highest version probed. `None` means the SDK default.
    pub max_version: Option<ApiVersion>,
    /// Lowest version probed.
    pub min_version: ApiVersion,
}

impl Default for LocalEngineConfig {
    fn default() -> Self {
        Self {
            host: None,
            api_version: None,
            max_version: None,
            min_version: MIN_API_VERSION,
        }
    }
}

impl LocalEngineConfig {
    /// Build from the process environment (`DOCKER_HOST`, `DOCKER_API_VERSION`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            host: non_blank(DOCKER_HOST_ENV),
            api_version: non_blank(DOCKER_API_VERSION_ENV),
            ..Self::default()
        }
    }

    /// Override the API version, skipping negotiation.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Search window for the downgrade probe.
    pub fn bounds(&self) -> VersionBounds {
        VersionBounds::new(
            self.max_version.unwrap_or_else(sdk_default_version),
            self.min_version,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn reads_host_and_override_from_lookup() {
        let cfg = LocalEngineConfig::from_lookup(lookup(&[
            ("DOCKER_HOST", "tcp://127.0.0.1:2375"),
            ("DOCKER_API_VERSION", "1.27"),
        ]));
        assert_eq!(cfg.host.as_deref(), Some("tcp://127.0.0.1:2375"));
        assert_eq!(cfg.api_version.as_deref(), Some("1.27"));
        assert_eq!(cfg.min_version, MIN_API_VERSION);
    }

    #[test]
    fn blank_values_are_unset() {
        let cfg = LocalEngineConfig::from_lookup(lookup(&[
            ("DOCKER_HOST", ""),
            ("DOCKER_API_VERSION", "  "),
        ]));
        assert_eq!(cfg, LocalEngineConfig::default());
    }

    #[test]
    fn bounds_default_to_sdk_version() {
        let cfg = LocalEngineConfig::default();
        assert_eq!(cfg.bounds().ceiling, sdk_default_version());
        assert_eq!(cfg.bounds().floor, MIN_API_VERSION);

        let cfg = LocalEngineConfig {
            max_version: Some(ApiVersion::new(1, 30)),
            ..Default::default()
        };
        assert_eq!(cfg.bounds().ceiling, ApiVersion::new(1, 30));
    }

    #[test]
    fn serde_fills_missing_fields_with_defaults() {
        let cfg: LocalEngineConfig =
            serde_json::from_str(r#"{"host":"unix:///run/docker.sock","maxVersion":null}"#)
                .unwrap();
        assert_eq!(cfg.host.as_deref(), Some("unix:///run/docker.sock"));
        assert_eq!(cfg.min_version, MIN_API_VERSION);

        let cfg: LocalEngineConfig = serde_json::from_str(r#"{"min_version":"1.12"}"#).unwrap();
        assert_eq!(cfg.min_version, ApiVersion::new(1, 12));
    }
}
