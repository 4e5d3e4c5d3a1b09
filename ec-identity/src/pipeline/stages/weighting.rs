//! Coefficient weighting stages

use crate::document::IdentityDocument;
use crate::pipeline::{Flow, Runnable, StageError};

/// Multiplies each selected digit by the coefficient at the same position.
///
/// The coefficient list must be exactly as long as `selected_digits`. A
/// mismatch is a configuration mistake, but it is reported like any other
/// validation failure.
#[derive(Debug, Clone)]
pub struct WeightedMultiply {
    coefficients: Vec<i64>,
}

impl WeightedMultiply {
    pub fn new(coefficients: Vec<i64>) -> Self {
        WeightedMultiply { coefficients }
    }
}

impl Runnable for WeightedMultiply {
    fn name(&self) -> &'static str {
        "weighted-multiply"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        if self.coefficients.len() != doc.selected_digits.len() {
            return Err(StageError::new(
                self.name(),
                format!(
                    "{} coefficients for {} selected digits",
                    self.coefficients.len(),
                    doc.selected_digits.len()
                ),
            ));
        }

        doc.weighted = self
            .coefficients
            .iter()
            .zip(&doc.selected_digits)
            .map(|(coefficient, digit)| {
                coefficient
                    .checked_mul(*digit)
                    .ok_or_else(|| StageError::new(self.name(), "product overflows"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Flow::Continue)
    }
}

/// Subtracts `subtrahend` from every weighted element that is at least
/// `threshold`. Does nothing when disabled.
#[derive(Debug, Clone)]
pub struct ConditionalAdjust {
    enabled: bool,
    threshold: i64,
    subtrahend: i64,
}

impl ConditionalAdjust {
    pub fn new(enabled: bool, threshold: i64, subtrahend: i64) -> Self {
        ConditionalAdjust {
            enabled,
            threshold,
            subtrahend,
        }
    }
}

impl Runnable for ConditionalAdjust {
    fn name(&self) -> &'static str {
        "conditional-adjust"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        if !self.enabled {
            return Ok(Flow::Continue);
        }

        for element in doc.weighted.iter_mut() {
            if *element >= self.threshold {
                *element = element
                    .checked_sub(self.subtrahend)
                    .ok_or_else(|| StageError::new(self.name(), "adjustment overflows"))?;
            }
        }
        Ok(Flow::Continue)
    }
}
