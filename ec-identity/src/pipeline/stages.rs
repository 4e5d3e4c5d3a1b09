//! Individual pipeline stages
//!
//! Every stage kind lives in its own small struct implementing [`Runnable`].
//! [`Stage`] is the closed sum type the builder produces and the driver loop
//! dispatches over; there is no open-ended plugin mechanism.

pub mod checksum;
pub mod comparison;
pub mod digits;
pub mod pattern;
pub mod substring;
pub mod weighting;

pub use checksum::{ModuloReduce, Sum};
pub use comparison::{ComplementCompare, EqualityShortCircuit, ExtractCheckDigit};
pub use digits::{Digitize, SelectByIndex};
pub use pattern::{PatternMatch, RegionMembership};
pub use substring::SubstringSlice;
pub use weighting::{ConditionalAdjust, WeightedMultiply};

use crate::document::IdentityDocument;
use crate::pipeline::{Flow, Runnable, StageError};

/// One configured step of a pipeline.
#[derive(Debug, Clone)]
pub enum Stage {
    PatternMatch(PatternMatch),
    RegionMembership(RegionMembership),
    Digitize(Digitize),
    SelectByIndex(SelectByIndex),
    SubstringSlice(SubstringSlice),
    WeightedMultiply(WeightedMultiply),
    ConditionalAdjust(ConditionalAdjust),
    Sum(Sum),
    ModuloReduce(ModuloReduce),
    ExtractCheckDigit(ExtractCheckDigit),
    EqualityShortCircuit(EqualityShortCircuit),
    ComplementCompare(ComplementCompare),
}

impl Stage {
    fn as_runnable(&self) -> &dyn Runnable {
        match self {
            Stage::PatternMatch(s) => s,
            Stage::RegionMembership(s) => s,
            Stage::Digitize(s) => s,
            Stage::SelectByIndex(s) => s,
            Stage::SubstringSlice(s) => s,
            Stage::WeightedMultiply(s) => s,
            Stage::ConditionalAdjust(s) => s,
            Stage::Sum(s) => s,
            Stage::ModuloReduce(s) => s,
            Stage::ExtractCheckDigit(s) => s,
            Stage::EqualityShortCircuit(s) => s,
            Stage::ComplementCompare(s) => s,
        }
    }
}

impl Runnable for Stage {
    fn name(&self) -> &'static str {
        self.as_runnable().name()
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        self.as_runnable().run(doc)
    }
}

/// Borrow `value[start..end]`, failing instead of panicking on a bad range.
pub(crate) fn slice<'a>(
    stage: &'static str,
    value: &'a str,
    start: usize,
    end: usize,
) -> Result<&'a str, StageError> {
    value.get(start..end).ok_or_else(|| {
        StageError::new(
            stage,
            format!(
                "range [{}, {}) is out of bounds for a value of length {}",
                start,
                end,
                value.len()
            ),
        )
    })
}

/// Numeric value of a decimal digit character.
pub(crate) fn decimal_digit(stage: &'static str, c: char) -> Result<i64, StageError> {
    c.to_digit(10)
        .map(i64::from)
        .ok_or_else(|| StageError::new(stage, format!("{:?} is not a decimal digit", c)))
}
