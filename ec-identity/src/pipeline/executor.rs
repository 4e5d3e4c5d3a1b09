//! Driver loop that runs a document through a built pipeline

use crate::document::IdentityDocument;
use crate::pipeline::builder::{BuildError, PipelineBuilder};
use crate::pipeline::spec::StageSpec;
use crate::pipeline::stages::Stage;
use crate::pipeline::{Flow, Runnable, StageError};
use std::fmt;

/// How a successful run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Every stage ran and none failed
    Exhausted,
    /// The stage at `index` accepted the document; later stages were skipped
    ShortCircuit { index: usize },
}

/// The first stage failure of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Zero-based position of the failing stage
    pub index: usize,
    pub error: StageError,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.index + 1, self.error)
    }
}

impl std::error::Error for Rejection {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Immutable, ordered list of stages.
///
/// A pipeline never changes after it is built and keeps no per-run state, so
/// a single instance can be shared between threads.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    pub(crate) fn new(stages: Vec<Stage>) -> Self {
        Pipeline { stages }
    }

    /// Shorthand for building from a slice of specs.
    pub fn from_specs(specs: &[StageSpec]) -> Result<Self, BuildError> {
        PipelineBuilder::new().stages(specs.iter().cloned()).build()
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run `doc` through every stage in order.
    ///
    /// Stops at the first failure, or early when a stage accepts. An empty
    /// pipeline accepts everything.
    pub fn run(&self, doc: &mut IdentityDocument) -> Result<Completion, Rejection> {
        for (index, stage) in self.stages.iter().enumerate() {
            match stage.run(doc) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Accept) => return Ok(Completion::ShortCircuit { index }),
                Err(error) => return Err(Rejection { index, error }),
            }
        }
        Ok(Completion::Exhausted)
    }
}
