//! Layered property loading for the ec-identity validators.
//!
//! `defaults/ec-identity.default.toml` is embedded into every binary so that the
//! documented defaults and the runtime behavior stay in sync. Applications layer
//! their own files and overrides on top of those defaults via [`Loader`] before
//! deserializing into [`IdentityConfig`].
//!
//! Values are kept as strings: this crate only gathers the flat, per-profile
//! property set. Turning `"2,1,2"` into a coefficient list is the job of the
//! library's settings module, which reports malformed values at startup.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat};
use serde::Deserialize;
use std::path::Path;

pub use config::{ConfigError, Value};

const DEFAULT_TOML: &str = include_str!("../defaults/ec-identity.default.toml");

/// Top-level property set, one table per document profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct IdentityConfig {
    pub ci: CiProperties,
    pub ruc_natural: RucNaturalProperties,
}

/// Raw properties of the cedula (CI) checksum pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CiProperties {
    pub regexp: String,
    pub province_index_initial: String,
    pub province_index_final: String,
    pub province_list: String,
    pub index_list: String,
    pub coefficient_list: String,
    pub adjuster: String,
    pub adjuster_max_value: String,
    pub adjuster_subtrahend: String,
    pub last_check_digit_index: String,
    pub last_check_digit_max_value: String,
    pub last_check_digit_divisor: String,
    pub comparison_value: String,
    pub comparison_minuend: String,
}

/// Raw properties of the natural-person RUC pipeline.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RucNaturalProperties {
    pub regexp: String,
    pub ci_index_initial: String,
    pub ci_index_final: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `("ci.coefficient-list", "2,1")`.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<Value>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting property set.
    pub fn build(self) -> Result<IdentityConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<IdentityConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.ci.regexp, r"^\d{10}$");
        assert_eq!(config.ci.coefficient_list, "2,1,2,1,2,1,2,1,2");
        assert_eq!(config.ci.last_check_digit_index, "9");
        assert_eq!(config.ruc_natural.ci_index_final, "10");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("ci.coefficient-list", "2,1")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.ci.coefficient_list, "2,1");
        // Untouched keys keep their defaults
        assert_eq!(config.ci.index_list, "0,1,2,3,4,5,6,7,8");
    }

    #[test]
    fn layers_user_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[ruc-natural]\nregexp = '^\\d{{13}}$'").expect("write temp file");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.ruc_natural.regexp, r"^\d{13}$");
        assert_eq!(config.ruc_natural.ci_index_initial, "0");
    }

    #[test]
    fn optional_file_may_be_missing() {
        let config = Loader::new()
            .with_optional_file("/nonexistent/ec-identity.toml")
            .build()
            .expect("missing optional file is ignored");
        assert_eq!(config.ci.comparison_minuend, "10");
    }

    #[test]
    fn required_file_must_exist() {
        let result = Loader::new()
            .with_file("/nonexistent/ec-identity.toml")
            .build();
        assert!(result.is_err());
    }
}
