//! Runs one raw value through a named pipeline
//!
//! [`IdentityProcessor`] pairs a built [`Pipeline`] with the profile name used
//! in log lines. Each call gets a fresh [`IdentityDocument`]; nothing is shared
//! between calls except the immutable pipeline, so a processor can be used
//! from any number of threads at once.

use crate::document::IdentityDocument;
use crate::pipeline::{Completion, Pipeline, Rejection};

/// Final state of one run together with its verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub document: IdentityDocument,
    pub outcome: Result<Completion, Rejection>,
}

impl Processed {
    pub fn is_valid(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Why the run was rejected, if it was.
    pub fn rejection(&self) -> Option<&Rejection> {
        self.outcome.as_ref().err()
    }
}

#[derive(Debug, Clone)]
pub struct IdentityProcessor {
    name: String,
    pipeline: Pipeline,
}

impl IdentityProcessor {
    pub fn new(name: impl Into<String>, pipeline: Pipeline) -> Self {
        IdentityProcessor {
            name: name.into(),
            pipeline,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Run `raw` through the pipeline and keep everything it produced.
    pub fn process(&self, raw: &str) -> Processed {
        let mut document = IdentityDocument::new(raw);
        let outcome = self.pipeline.run(&mut document);

        match &outcome {
            Ok(Completion::Exhausted) => {
                log::debug!("{}: accepted after {} stages", self.name, self.pipeline.len());
            }
            Ok(Completion::ShortCircuit { index }) => {
                log::debug!("{}: accepted early at step {}", self.name, index + 1);
            }
            Err(rejection) => {
                // The raw value stays out of the log
                log::info!(
                    "{}: rejected at step {} ({}): {}",
                    self.name,
                    rejection.index + 1,
                    rejection.error.stage,
                    rejection.error.reason
                );
            }
        }

        Processed { document, outcome }
    }

    /// `true` when every stage passed or one accepted early.
    pub fn validate(&self, raw: &str) -> bool {
        self.process(raw).is_valid()
    }
}
