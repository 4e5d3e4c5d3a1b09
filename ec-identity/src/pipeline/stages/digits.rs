//! Digit extraction stages

use crate::document::IdentityDocument;
use crate::pipeline::stages::decimal_digit;
use crate::pipeline::{Flow, Runnable, StageError};

/// Splits `value` into its decimal digits.
#[derive(Debug, Clone, Default)]
pub struct Digitize;

impl Digitize {
    pub fn new() -> Self {
        Digitize
    }
}

impl Runnable for Digitize {
    fn name(&self) -> &'static str {
        "digitize"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        doc.digits = doc
            .value
            .chars()
            .map(|c| decimal_digit(self.name(), c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Flow::Continue)
    }
}

/// Keeps the digits at the configured positions, in configured order.
///
/// Positions outside `[0, digits.len())` are skipped silently, so a list that
/// is longer than the input never fails here.
#[derive(Debug, Clone)]
pub struct SelectByIndex {
    indices: Vec<i64>,
}

impl SelectByIndex {
    pub fn new(indices: Vec<i64>) -> Self {
        SelectByIndex { indices }
    }
}

impl Runnable for SelectByIndex {
    fn name(&self) -> &'static str {
        "select-by-index"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let digits = &doc.digits;
        doc.selected_digits = self
            .indices
            .iter()
            .filter_map(|&index| usize::try_from(index).ok())
            .filter_map(|index| digits.get(index).copied())
            .collect();
        Ok(Flow::Continue)
    }
}
