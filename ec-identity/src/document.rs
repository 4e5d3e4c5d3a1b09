//! The per-call record threaded through a checksum pipeline
//!
//! An [`IdentityDocument`] is created fresh for every validation call, mutated in
//! place by each stage and dropped once the verdict is known. Fields that a stage
//! has not produced yet are empty (or `None`), so a stage that reads them can tell
//! a misconfigured pipeline apart from a bad input.

use std::fmt;

/// Mutable state of one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityDocument {
    /// Text under validation. A substring stage may replace it.
    pub value: String,
    /// `value` split into its decimal digits, left to right.
    pub digits: Vec<i64>,
    /// Digits picked out of `digits` by position.
    pub selected_digits: Vec<i64>,
    /// `selected_digits` multiplied by the coefficients (and possibly adjusted).
    pub weighted: Vec<i64>,
    /// Running check value derived from `weighted`.
    pub checksum: Option<i64>,
    /// Digit read straight from `value`, the expected result of the checksum.
    pub check_digit: Option<i64>,
}

impl IdentityDocument {
    /// Start a run over `value`.
    pub fn new(value: impl Into<String>) -> Self {
        IdentityDocument {
            value: value.into(),
            ..Default::default()
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, label: &str, items: &[i64]) -> fmt::Result {
    let joined = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    write!(f, " {}=[{}]", label, joined)
}

fn write_opt(f: &mut fmt::Formatter<'_>, label: &str, item: Option<i64>) -> fmt::Result {
    match item {
        Some(v) => write!(f, " {}={}", label, v),
        None => write!(f, " {}=-", label),
    }
}

/// Compact single-line trace, used by the CLI `--trace` flag.
impl fmt::Display for IdentityDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "value={:?}", self.value)?;
        write_list(f, "digits", &self.digits)?;
        write_list(f, "selected", &self.selected_digits)?;
        write_list(f, "weighted", &self.weighted)?;
        write_opt(f, "checksum", self.checksum)?;
        write_opt(f, "check_digit", self.check_digit)
    }
}
