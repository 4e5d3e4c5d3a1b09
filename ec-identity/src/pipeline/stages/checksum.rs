//! Checksum accumulation stages

use crate::document::IdentityDocument;
use crate::pipeline::{Flow, Runnable, StageError};

/// `checksum = sum(weighted)`.
#[derive(Debug, Clone, Default)]
pub struct Sum;

impl Sum {
    pub fn new() -> Self {
        Sum
    }
}

impl Runnable for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let total = doc
            .weighted
            .iter()
            .try_fold(0i64, |acc, value| acc.checked_add(*value))
            .ok_or_else(|| StageError::new(self.name(), "sum overflows"))?;
        doc.checksum = Some(total);
        Ok(Flow::Continue)
    }
}

/// Replaces the checksum with `checksum % divisor` once it reaches `threshold`.
#[derive(Debug, Clone)]
pub struct ModuloReduce {
    threshold: i64,
    divisor: i64,
}

impl ModuloReduce {
    pub fn new(threshold: i64, divisor: i64) -> Self {
        ModuloReduce { threshold, divisor }
    }
}

impl Runnable for ModuloReduce {
    fn name(&self) -> &'static str {
        "modulo-reduce"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let checksum = doc
            .checksum
            .ok_or_else(|| StageError::new(self.name(), "missing checksum"))?;
        if checksum >= self.threshold {
            let reduced = checksum.checked_rem(self.divisor).ok_or_else(|| {
                StageError::new(
                    self.name(),
                    format!("cannot reduce {} modulo {}", checksum, self.divisor),
                )
            })?;
            doc.checksum = Some(reduced);
        }
        Ok(Flow::Continue)
    }
}
