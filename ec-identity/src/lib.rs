//! # ec-identity
//!
//! Validation of Ecuadorian identity numbers through declaratively configured
//! checksum pipelines.
//!
//! The engine does not know any particular checksum. A pipeline is an ordered
//! list of small digit-stream stages (pattern match, digitize, weighting, sum,
//! modulo, comparisons...) and the order and parameters come from
//! configuration. Two profiles ship with the crate:
//!
//! - `ci`: the 10-digit cedula de identidad
//! - `ruc-natural`: the 13-digit RUC of a natural person, which embeds a cedula
//!   and re-validates it through the `ci` pipeline
//!
//! Layout
//!
//! src/
//!   ├── document.rs    Per-call state threaded through a pipeline
//!   ├── pipeline/      Stage kinds, specs, builder, driver loop, lint
//!   ├── processor.rs   Runs a raw value through one pipeline
//!   ├── settings.rs    String properties parsed into typed parameters
//!   └── profiles.rs    The two profiles, their validators, process-wide defaults
//!
//! Quick use:
//!
//! ```rust,ignore
//! assert!(ec_identity::validate_ci("2222222222"));
//! assert!(ec_identity::validate_ruc_natural("2222222222001"));
//! ```

pub mod document;
pub mod pipeline;
pub mod processor;
pub mod profiles;
pub mod settings;

pub use document::IdentityDocument;
pub use processor::{IdentityProcessor, Processed};
pub use profiles::{
    default_profiles, validate_ci, validate_ruc_natural, CiValidator, Profile, ProfileError,
    Profiles, RucNaturalValidator, Validator, Verdict,
};
