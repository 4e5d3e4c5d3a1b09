//! Check digit extraction and the final comparisons

use crate::document::IdentityDocument;
use crate::pipeline::stages::decimal_digit;
use crate::pipeline::{Flow, Runnable, StageError};

/// Reads the expected check digit from `value` at a fixed position.
///
/// Reads the text, not `digits`, so it still works after a substring stage.
#[derive(Debug, Clone)]
pub struct ExtractCheckDigit {
    position: usize,
}

impl ExtractCheckDigit {
    pub fn new(position: usize) -> Self {
        ExtractCheckDigit { position }
    }
}

impl Runnable for ExtractCheckDigit {
    fn name(&self) -> &'static str {
        "extract-check-digit"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let c = doc.value.chars().nth(self.position).ok_or_else(|| {
            StageError::new(
                self.name(),
                format!("no character at position {}", self.position),
            )
        })?;
        doc.check_digit = Some(decimal_digit(self.name(), c)?);
        Ok(Flow::Continue)
    }
}

fn checksum_and_digit(
    stage: &'static str,
    doc: &IdentityDocument,
) -> Result<(i64, i64), StageError> {
    let checksum = doc
        .checksum
        .ok_or_else(|| StageError::new(stage, "missing checksum"))?;
    let check_digit = doc
        .check_digit
        .ok_or_else(|| StageError::new(stage, "missing check digit"))?;
    Ok((checksum, check_digit))
}

/// Special-value branch of the check digit comparison.
///
/// When the checksum equals `value`, the check digit must equal it too and the
/// pipeline ends right here: later stages never run. Any other checksum passes
/// straight through to the next stage.
#[derive(Debug, Clone)]
pub struct EqualityShortCircuit {
    value: i64,
}

impl EqualityShortCircuit {
    pub fn new(value: i64) -> Self {
        EqualityShortCircuit { value }
    }
}

impl Runnable for EqualityShortCircuit {
    fn name(&self) -> &'static str {
        "equality-short-circuit"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let (checksum, check_digit) = checksum_and_digit(self.name(), doc)?;
        if checksum != self.value {
            return Ok(Flow::Continue);
        }
        if check_digit != self.value {
            return Err(StageError::new(
                self.name(),
                format!(
                    "checksum is {} but check digit is {}",
                    self.value, check_digit
                ),
            ));
        }
        Ok(Flow::Accept)
    }
}

/// Requires `minuend - checksum == check_digit`.
#[derive(Debug, Clone)]
pub struct ComplementCompare {
    minuend: i64,
}

impl ComplementCompare {
    pub fn new(minuend: i64) -> Self {
        ComplementCompare { minuend }
    }
}

impl Runnable for ComplementCompare {
    fn name(&self) -> &'static str {
        "complement-compare"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let (checksum, check_digit) = checksum_and_digit(self.name(), doc)?;
        let expected = self
            .minuend
            .checked_sub(checksum)
            .ok_or_else(|| StageError::new(self.name(), "complement overflows"))?;
        if expected != check_digit {
            return Err(StageError::new(
                self.name(),
                format!("expected check digit {}, found {}", expected, check_digit),
            ));
        }
        Ok(Flow::Continue)
    }
}
