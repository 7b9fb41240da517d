use serde::{Deserialize, Serialize};

/// Boolean switch with explicit on/off constructors.
///
/// Used for configuration toggles such as the initial per-client debug state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Flag(bool);

impl Flag {
    pub const fn enabled() -> Self {
        Self(true)
    }

    pub const fn disabled() -> Self {
        Self(false)
    }

    pub const fn is_enabled(&self) -> bool {
        self.0
    }

    /// Parse an environment-style switch (`1`, `true`, `yes`, `on`; anything else is off).
    pub fn from_switch(s: &str) -> Self {
        let norm = s.trim().to_ascii_lowercase();
        Self(matches!(norm.as_str(), "1" | "true" | "yes" | "on"))
    }
}

impl From<bool> for Flag {
    fn from(b: bool) -> Self {
        Self(b)
    }
}

impl From<Flag> for bool {
    fn from(f: Flag) -> Self {
        f.0
    }
}
