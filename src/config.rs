//! Service configuration loaded from YAML documents.
//!
//! Every field is optional in the document; omitted values fall back to the
//! defaults below. Command-line flags are applied on top of the loaded
//! document by the binary.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{self, Error},
    request::DEFAULT_MAX_INLINE_IMAGE_BYTES
};

/// Address the HTTP server binds to by default.
pub const DEFAULT_BIND: &str = "127.0.0.1:8080";
/// Shared-cache lifetime advertised on successful responses, in seconds.
pub const DEFAULT_CACHE_MAX_AGE: u64 = 1800;

/// Runtime settings of the badge service.
///
/// # Examples
///
/// ```
/// use repocard::ServiceConfig;
///
/// let yaml = r#"
/// bind: 0.0.0.0:9000
/// cache_max_age: 600
/// "#;
/// let config = ServiceConfig::from_yaml(yaml).expect("valid configuration");
/// assert_eq!(config.bind, "0.0.0.0:9000");
/// assert_eq!(config.cache_max_age, 600);
/// assert_eq!(config.max_inline_image_bytes, 800_000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Socket address of the HTTP listener.
    pub bind: String,

    /// GitHub REST API base URL override, mainly for GitHub Enterprise.
    pub api_base: Option<String>,

    /// Value of `s-maxage` on successful responses.
    pub cache_max_age: u64,

    /// Largest decoded inline image accepted, in bytes.
    pub max_inline_image_bytes: usize
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind:                   DEFAULT_BIND.to_owned(),
            api_base:               None,
            cache_max_age:          DEFAULT_CACHE_MAX_AGE,
            max_inline_image_bytes: DEFAULT_MAX_INLINE_IMAGE_BYTES
        }
    }
}

impl ServiceConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`]
    /// for malformed YAML and [`Error::Validation`] for rejected values.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
        debug!("Loaded service configuration from {}", path.display());
        Self::from_yaml(&contents)
    }

    /// Parses and validates a YAML document.
    ///
    /// An empty document yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] for malformed YAML or unknown fields and
    /// [`Error::Validation`] for rejected values.
    pub fn from_yaml(contents: &str) -> Result<Self, Error> {
        let config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.validate()
    }

    /// Checks value constraints and normalizes optional strings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the bind address is empty or the
    /// inline image limit is zero.
    pub fn validate(mut self) -> Result<Self, Error> {
        self.bind = self.bind.trim().to_owned();
        if self.bind.is_empty() {
            return Err(Error::validation("bind address must not be empty"));
        }
        if self.max_inline_image_bytes == 0 {
            return Err(Error::validation("max_inline_image_bytes must be greater than zero"));
        }
        self.api_base = self
            .api_base
            .map(|base| base.trim().to_owned())
            .filter(|base| !base.is_empty());
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = ServiceConfig::from_yaml("  \n").expect("defaults");
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let config = ServiceConfig::from_yaml("api_base: ' https://ghe.example.com/api/v3 '\n")
            .expect("valid configuration");
        assert_eq!(config.api_base.as_deref(), Some("https://ghe.example.com/api/v3"));
        assert_eq!(config.bind, DEFAULT_BIND);
        assert_eq!(config.cache_max_age, DEFAULT_CACHE_MAX_AGE);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let error = ServiceConfig::from_yaml("port: 80\n").expect_err("unknown field");
        assert!(matches!(error, Error::Parse { .. }));
    }

    #[test]
    fn empty_bind_is_rejected() {
        let error = ServiceConfig::from_yaml("bind: '  '\n").expect_err("empty bind");
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn zero_image_limit_is_rejected() {
        let error =
            ServiceConfig::from_yaml("max_inline_image_bytes: 0\n").expect_err("zero limit");
        assert!(error.to_string().contains("max_inline_image_bytes"));
    }

    #[test]
    fn blank_api_base_is_cleared() {
        let config = ServiceConfig::from_yaml("api_base: ''\n").expect("valid configuration");
        assert_eq!(config.api_base, None);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(file, "bind: 0.0.0.0:3000\ncache_max_age: 60").expect("write config");

        let config = ServiceConfig::load(file.path()).expect("valid configuration");
        assert_eq!(config.bind, "0.0.0.0:3000");
        assert_eq!(config.cache_max_age, 60);
    }

    #[test]
    fn load_reports_missing_file() {
        let directory = tempfile::tempdir().expect("temp dir");
        let path = directory.path().join("missing.yaml");
        let error = ServiceConfig::load(&path).expect_err("missing file");
        assert!(matches!(error, Error::Io { .. }));
    }
}
