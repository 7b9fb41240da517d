use std::{fmt, str::FromStr};

use crate::{ModelError, ModelResult};

/// Parsed `<repository>:<browser>_<version>` image reference.
///
/// The tag doubles as a browser descriptor: `selenoid/chrome:chrome_70.1` names browser
/// `chrome` at version `70.1`. Anything else is rejected; nothing is defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageRef {
    raw: String,
    repository: String,
    browser: String,
    version: f64,
}

impl ImageRef {
    pub fn parse(input: &str) -> ModelResult<Self> {
        let invalid = |reason: &str| ModelError::InvalidImage {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = input.split(':').collect();
        let [repository, tag] = parts.as_slice() else {
            return Err(invalid("expected <image>:<tag>"));
        };
        if repository.is_empty() || tag.is_empty() {
            return Err(invalid("expected <image>:<tag>"));
        }

        let pieces: Vec<&str> = tag.split('_').collect();
        let [browser, version] = pieces.as_slice() else {
            return Err(invalid("tag must be <browser>_<version_number>"));
        };
        if browser.is_empty() || !browser.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid("browser must be non-empty and alphanumeric"));
        }

        let version: f64 = version
            .parse()
            .map_err(|e| invalid(&format!("browser version: {e}")))?;
        if !version.is_finite() || version < 0.0 {
            return Err(invalid("browser version must be a finite non-negative number"));
        }

        Ok(Self {
            raw: input.to_string(),
            repository: repository.to_string(),
            browser: browser.to_ascii_lowercase(),
            version,
        })
    }

    /// The reference exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// Browser name, lowercased.
    pub fn browser(&self) -> &str {
        &self.browser
    }

    pub fn version(&self) -> f64 {
        self.version
    }

    /// Whole part and first decimal digit of the version: `70.1` → `(70, 1)`.
    pub fn version_parts(&self) -> (u64, u64) {
        let whole = self.version.trunc();
        let tenth = ((self.version - whole) * 10.0).round();
        // Rounding 0.95 up would otherwise yield a tenth of 10.
        if tenth >= 10.0 {
            (whole as u64 + 1, 0)
        } else {
            (whole as u64, tenth as u64)
        }
    }
}

impl FromStr for ImageRef {
    type Err = ModelError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
