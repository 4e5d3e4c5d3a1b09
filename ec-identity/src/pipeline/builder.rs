//! Turns an ordered list of [`StageSpec`]s into an executable [`Pipeline`]
//!
//! Building is pure: no I/O, and every parameter must already be typed. The
//! only build-time failures are parameters a stage cannot be constructed from
//! (a broken regular expression, a zero divisor). Suspicious but constructible
//! combinations go through [`lint_specs`] and are logged, never rejected.

use crate::pipeline::executor::Pipeline;
use crate::pipeline::spec::StageSpec;
use crate::pipeline::stages::*;
use crate::pipeline::validation::lint_specs;
use std::fmt;

/// Errors that prevent a stage from being constructed
#[derive(Debug, Clone)]
pub enum BuildError {
    /// The pattern of the stage at `index` is not a valid regular expression
    InvalidPattern { index: usize, source: regex::Error },
    /// The modulo stage at `index` has a divisor of zero
    ZeroDivisor { index: usize },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::InvalidPattern { index, source } => {
                write!(f, "Stage {}: invalid pattern: {}", index + 1, source)
            }
            BuildError::ZeroDivisor { index } => {
                write!(f, "Stage {}: modulo divisor must not be zero", index + 1)
            }
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::InvalidPattern { source, .. } => Some(source),
            BuildError::ZeroDivisor { .. } => None,
        }
    }
}

/// Collects stage specs and builds them into a [`Pipeline`].
///
/// # Examples
///
/// ```ignore
/// let pipeline = PipelineBuilder::new()
///     .stage(StageSpec::Digitize)
///     .stage(StageSpec::SelectByIndex { indices: vec![0, 1] })
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct PipelineBuilder {
    specs: Vec<StageSpec>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        PipelineBuilder { specs: Vec::new() }
    }

    /// Append one stage. Stages run in the order they are added.
    pub fn stage(mut self, spec: StageSpec) -> Self {
        self.specs.push(spec);
        self
    }

    /// Append several stages, in order.
    pub fn stages(mut self, specs: impl IntoIterator<Item = StageSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// The specs collected so far.
    pub fn specs(&self) -> &[StageSpec] {
        &self.specs
    }

    /// Instantiate every stage, in order.
    pub fn build(&self) -> Result<Pipeline, BuildError> {
        for warning in lint_specs(&self.specs) {
            log::warn!("{}", warning);
        }

        let stages = self
            .specs
            .iter()
            .enumerate()
            .map(|(index, spec)| build_stage(index, spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Pipeline::new(stages))
    }
}

fn build_stage(index: usize, spec: &StageSpec) -> Result<Stage, BuildError> {
    let stage = match spec {
        StageSpec::PatternMatch { pattern } => Stage::PatternMatch(
            PatternMatch::new(pattern)
                .map_err(|source| BuildError::InvalidPattern { index, source })?,
        ),
        StageSpec::RegionMembership {
            start,
            end,
            allowed,
        } => Stage::RegionMembership(RegionMembership::new(*start, *end, allowed.clone())),
        StageSpec::Digitize => Stage::Digitize(Digitize::new()),
        StageSpec::SelectByIndex { indices } => {
            Stage::SelectByIndex(SelectByIndex::new(indices.clone()))
        }
        StageSpec::SubstringSlice { start, end } => {
            Stage::SubstringSlice(SubstringSlice::new(*start, *end))
        }
        StageSpec::WeightedMultiply { coefficients } => {
            Stage::WeightedMultiply(WeightedMultiply::new(coefficients.clone()))
        }
        StageSpec::ConditionalAdjust {
            enabled,
            threshold,
            subtrahend,
        } => Stage::ConditionalAdjust(ConditionalAdjust::new(*enabled, *threshold, *subtrahend)),
        StageSpec::Sum => Stage::Sum(Sum::new()),
        StageSpec::ModuloReduce { threshold, divisor } => {
            if *divisor == 0 {
                return Err(BuildError::ZeroDivisor { index });
            }
            Stage::ModuloReduce(ModuloReduce::new(*threshold, *divisor))
        }
        StageSpec::ExtractCheckDigit { position } => {
            Stage::ExtractCheckDigit(ExtractCheckDigit::new(*position))
        }
        StageSpec::EqualityShortCircuit { value } => {
            Stage::EqualityShortCircuit(EqualityShortCircuit::new(*value))
        }
        StageSpec::ComplementCompare { minuend } => {
            Stage::ComplementCompare(ComplementCompare::new(*minuend))
        }
    };
    Ok(stage)
}
