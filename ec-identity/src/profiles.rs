//! The two document profiles and their validators
//!
//! A profile is a named pipeline configuration for one document kind. The CI
//! profile runs the full cedula checksum. The RUC natural profile checks its own
//! shape, slices out the embedded cedula and hands that to the CI processor, so
//! a RUC number is valid only when both pipelines accept it.
//!
//! [`Profiles::from_config`] builds both validators from an explicit
//! configuration. [`default_profiles`] is the process-wide instance built from
//! the embedded defaults, initialized once on first use.

use crate::document::IdentityDocument;
use crate::pipeline::{BuildError, PipelineBuilder, Rejection};
use crate::processor::IdentityProcessor;
use crate::settings::{CiSettings, RucNaturalSettings, SettingsError};
use ec_identity_config::{load_defaults, ConfigError, IdentityConfig};
use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Document kinds with a configured pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Profile {
    /// Cedula de identidad, 10 digits
    Ci,
    /// RUC of a natural person, 13 digits embedding a cedula
    RucNatural,
}

impl Profile {
    pub const ALL: [Profile; 2] = [Profile::Ci, Profile::RucNatural];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::Ci => "ci",
            Profile::RucNatural => "ruc-natural",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Profile::Ci => "Cedula de identidad (10 digits)",
            Profile::RucNatural => "RUC of a natural person (13 digits, embeds a cedula)",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Profile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| ProfileError::UnknownProfile(s.to_string()))
    }
}

/// Errors raised while setting up validators
#[derive(Debug)]
pub enum ProfileError {
    UnknownProfile(String),
    Config(ConfigError),
    Settings(SettingsError),
    Build { profile: Profile, source: BuildError },
}

impl fmt::Display for ProfileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileError::UnknownProfile(name) => write!(f, "Unknown profile '{}'", name),
            ProfileError::Config(e) => write!(f, "Configuration error: {}", e),
            ProfileError::Settings(e) => write!(f, "{}", e),
            ProfileError::Build { profile, source } => {
                write!(f, "Cannot build the {} pipeline: {}", profile, source)
            }
        }
    }
}

impl std::error::Error for ProfileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProfileError::UnknownProfile(_) => None,
            ProfileError::Config(e) => Some(e),
            ProfileError::Settings(e) => Some(e),
            ProfileError::Build { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for ProfileError {
    fn from(e: ConfigError) -> Self {
        ProfileError::Config(e)
    }
}

impl From<SettingsError> for ProfileError {
    fn from(e: SettingsError) -> Self {
        ProfileError::Settings(e)
    }
}

/// Result of checking one value against a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Final document of the profile's own pipeline
    pub document: IdentityDocument,
    /// Which profile's pipeline rejected the value, and where
    pub rejection: Option<(Profile, Rejection)>,
}

impl Verdict {
    pub fn is_valid(&self) -> bool {
        self.rejection.is_none()
    }

    /// Human-readable reason for a rejection.
    pub fn reason(&self) -> Option<String> {
        self.rejection
            .as_ref()
            .map(|(profile, rejection)| format!("{}: {}", profile, rejection))
    }
}

/// Validation entry point for one profile
pub trait Validator: Send + Sync {
    fn profile(&self) -> Profile;

    fn check(&self, raw: &str) -> Verdict;

    fn is_valid(&self, raw: &str) -> bool {
        self.check(raw).is_valid()
    }
}

fn build_processor(
    profile: Profile,
    specs: Vec<crate::pipeline::StageSpec>,
) -> Result<IdentityProcessor, ProfileError> {
    let pipeline = PipelineBuilder::new()
        .stages(specs)
        .build()
        .map_err(|source| ProfileError::Build { profile, source })?;
    Ok(IdentityProcessor::new(profile.as_str(), pipeline))
}

#[derive(Debug, Clone)]
pub struct CiValidator {
    processor: Arc<IdentityProcessor>,
}

impl CiValidator {
    pub fn new(settings: &CiSettings) -> Result<Self, ProfileError> {
        let processor = build_processor(Profile::Ci, settings.stage_specs())?;
        Ok(CiValidator {
            processor: Arc::new(processor),
        })
    }

    pub fn processor(&self) -> &Arc<IdentityProcessor> {
        &self.processor
    }
}

impl Validator for CiValidator {
    fn profile(&self) -> Profile {
        Profile::Ci
    }

    fn check(&self, raw: &str) -> Verdict {
        let processed = self.processor.process(raw);
        Verdict {
            document: processed.document,
            rejection: processed.outcome.err().map(|r| (Profile::Ci, r)),
        }
    }
}

/// RUC natural validator: its own pipeline, then the CI pipeline on the
/// extracted cedula.
#[derive(Debug, Clone)]
pub struct RucNaturalValidator {
    processor: IdentityProcessor,
    ci: Arc<IdentityProcessor>,
}

impl RucNaturalValidator {
    pub fn new(
        settings: &RucNaturalSettings,
        ci: Arc<IdentityProcessor>,
    ) -> Result<Self, ProfileError> {
        let processor = build_processor(Profile::RucNatural, settings.stage_specs())?;
        Ok(RucNaturalValidator { processor, ci })
    }
}

impl Validator for RucNaturalValidator {
    fn profile(&self) -> Profile {
        Profile::RucNatural
    }

    fn check(&self, raw: &str) -> Verdict {
        let processed = self.processor.process(raw);
        if let Err(rejection) = processed.outcome {
            return Verdict {
                document: processed.document,
                rejection: Some((Profile::RucNatural, rejection)),
            };
        }

        let embedded = self.ci.process(&processed.document.value);
        Verdict {
            document: processed.document,
            rejection: embedded.outcome.err().map(|r| (Profile::Ci, r)),
        }
    }
}

/// Both validators, built from one configuration
#[derive(Debug, Clone)]
pub struct Profiles {
    ci: CiValidator,
    ruc_natural: RucNaturalValidator,
}

impl Profiles {
    pub fn from_config(config: &IdentityConfig) -> Result<Self, ProfileError> {
        let ci_settings = CiSettings::from_properties(&config.ci)?;
        let ruc_settings = RucNaturalSettings::from_properties(&config.ruc_natural)?;

        let ci = CiValidator::new(&ci_settings)?;
        let ruc_natural = RucNaturalValidator::new(&ruc_settings, Arc::clone(ci.processor()))?;
        Ok(Profiles { ci, ruc_natural })
    }

    /// Build from the embedded defaults only.
    pub fn from_defaults() -> Result<Self, ProfileError> {
        Self::from_config(&load_defaults()?)
    }

    pub fn ci(&self) -> &CiValidator {
        &self.ci
    }

    pub fn ruc_natural(&self) -> &RucNaturalValidator {
        &self.ruc_natural
    }

    pub fn get(&self, profile: Profile) -> &dyn Validator {
        match profile {
            Profile::Ci => &self.ci,
            Profile::RucNatural => &self.ruc_natural,
        }
    }
}

static DEFAULT_PROFILES: Lazy<Profiles> = Lazy::new(|| {
    log::debug!("building default validation profiles");
    Profiles::from_defaults().expect("embedded default configuration must be valid")
});

/// Process-wide validators over the embedded defaults.
pub fn default_profiles() -> &'static Profiles {
    &DEFAULT_PROFILES
}

/// Check a cedula against the default configuration.
pub fn validate_ci(raw: &str) -> bool {
    default_profiles().ci().is_valid(raw)
}

/// Check a natural-person RUC against the default configuration.
pub fn validate_ruc_natural(raw: &str) -> bool {
    default_profiles().ruc_natural().is_valid(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec_identity_config::Loader;

    #[test]
    fn test_profile_names_round_trip() {
        for profile in Profile::ALL {
            assert_eq!(profile.as_str().parse::<Profile>().unwrap(), profile);
        }
        assert!(matches!(
            "ruc".parse::<Profile>(),
            Err(ProfileError::UnknownProfile(name)) if name == "ruc"
        ));
    }

    #[test]
    fn test_default_profiles_golden_values() {
        assert!(validate_ci("2222222222"));
        assert!(!validate_ci("2222222223"));
        assert!(validate_ruc_natural("2222222222001"));
        assert!(!validate_ruc_natural("2222222222002"));
    }

    #[test]
    fn test_ruc_rejection_names_the_failing_profile() {
        let profiles = Profiles::from_defaults().unwrap();

        let verdict = profiles.ruc_natural().check("2222222222002");
        let (profile, rejection) = verdict.rejection.unwrap();
        assert_eq!(profile, Profile::RucNatural);
        assert_eq!(rejection.error.stage, "pattern-match");

        let verdict = profiles.ruc_natural().check("2222222223001");
        let (profile, rejection) = verdict.rejection.clone().unwrap();
        assert_eq!(profile, Profile::Ci);
        assert_eq!(rejection.error.stage, "complement-compare");
        // The document is the RUC pipeline's own, after slicing
        assert_eq!(verdict.document.value, "2222222223");
        assert!(verdict.reason().unwrap().starts_with("ci: Step 11:"));
    }

    #[test]
    fn test_get_dispatches_by_profile() {
        let profiles = Profiles::from_defaults().unwrap();
        for profile in Profile::ALL {
            assert_eq!(profiles.get(profile).profile(), profile);
        }
    }

    #[test]
    fn test_zero_divisor_is_a_build_error() {
        let config = Loader::new()
            .set_override("ci.last-check-digit-divisor", "0")
            .unwrap()
            .build()
            .unwrap();
        let err = Profiles::from_config(&config).unwrap_err();
        assert!(matches!(
            err,
            ProfileError::Build {
                profile: Profile::Ci,
                source: BuildError::ZeroDivisor { index: 7 }
            }
        ));
    }

    #[test]
    fn test_malformed_setting_is_reported() {
        let config = Loader::new()
            .set_override("ruc-natural.ci-index-final", "ten")
            .unwrap()
            .build()
            .unwrap();
        let err = Profiles::from_config(&config).unwrap_err();
        match err {
            ProfileError::Settings(e) => assert_eq!(e.key, "ruc-natural.ci-index-final"),
            other => panic!("Expected settings error, got {}", other),
        }
    }
}
