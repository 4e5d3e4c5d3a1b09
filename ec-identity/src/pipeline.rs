//! Declaratively configured checksum pipelines
//!
//! A pipeline is an ordered, immutable list of [`Stage`]s. Each stage reads and
//! writes fields of an [`IdentityDocument`](crate::document::IdentityDocument) and
//! either lets the run continue, accepts the document outright, or rejects it with
//! a [`StageError`].
//!
//! # Module Organization
//!
//! - [`spec`]: serializable [`StageSpec`] describing one stage and its parameters
//! - [`stages`]: the stage kinds and the closed [`Stage`] sum type over them
//! - [`builder`]: turns an ordered list of specs into a [`Pipeline`]
//! - [`executor`]: the driver loop that runs a document through a [`Pipeline`]
//! - [`validation`]: lint pass that flags suspicious spec lists without rejecting them
//!
//! # Example
//!
//! ```rust,ignore
//! use ec_identity::pipeline::{PipelineBuilder, StageSpec};
//!
//! let pipeline = PipelineBuilder::new()
//!     .stage(StageSpec::PatternMatch { pattern: r"\d{3}".into() })
//!     .stage(StageSpec::Digitize)
//!     .build()?;
//! ```

pub mod builder;
pub mod executor;
pub mod spec;
pub mod stages;
pub mod validation;

use crate::document::IdentityDocument;
use std::fmt;

pub use builder::{BuildError, PipelineBuilder};
pub use executor::{Completion, Pipeline, Rejection};
pub use spec::StageSpec;
pub use stages::Stage;
pub use validation::{lint_specs, SpecWarning};

/// What the driver should do after a stage succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Hand the document to the next stage (or finish if this was the last one).
    Continue,
    /// Stop here: the document is valid and later stages must not run.
    Accept,
}

/// Uniform validation failure raised by a stage.
///
/// Input-shape problems, checksum mismatches and configuration-integrity
/// problems all use this one type; only the reason text tells them apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageError {
    pub stage: &'static str,
    pub reason: String,
}

impl StageError {
    pub fn new(stage: &'static str, reason: impl Into<String>) -> Self {
        StageError {
            stage,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stage '{}' failed: {}", self.stage, self.reason)
    }
}

impl std::error::Error for StageError {}

/// Trait for anything that can process a document as one pipeline step
///
/// Implementations hold only their fixed configuration, never per-document
/// state, so one built pipeline can serve any number of concurrent calls.
pub trait Runnable {
    /// Stable kebab-case name, used in log lines and failures.
    fn name(&self) -> &'static str;

    /// Process the document in place.
    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_error_display() {
        let err = StageError::new("pattern-match", "value does not match");
        assert_eq!(
            format!("{}", err),
            "Stage 'pattern-match' failed: value does not match"
        );
    }

    #[test]
    fn test_stage_error_accepts_owned_reason() {
        let err = StageError::new("sum", format!("overflow after {} items", 3));
        assert_eq!(err.reason, "overflow after 3 items");
        assert_eq!(err.stage, "sum");
    }
}
