//! Serializable description of pipeline stages
//!
//! A `Vec<StageSpec>` is the declarative form of a pipeline: which stages run,
//! in which order, with which parameters. All parameters are already typed;
//! turning property strings into these values happens in
//! [`settings`](crate::settings).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One stage and its parameters (tagged enum).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", rename_all = "kebab-case")]
pub enum StageSpec {
    /// The whole value must match `pattern`
    PatternMatch { pattern: String },

    /// `value[start..end]` must be one of `allowed`
    RegionMembership {
        start: usize,
        end: usize,
        allowed: BTreeSet<String>,
    },

    /// Split `value` into decimal digits
    Digitize,

    /// Keep the digits at `indices`; out-of-range indices are skipped
    SelectByIndex { indices: Vec<i64> },

    /// Replace `value` with `value[start..end]`
    SubstringSlice { start: usize, end: usize },

    /// Multiply the selected digits by `coefficients`, element-wise
    WeightedMultiply { coefficients: Vec<i64> },

    /// Subtract `subtrahend` from weighted elements `>= threshold`, if `enabled`
    ConditionalAdjust {
        enabled: bool,
        threshold: i64,
        subtrahend: i64,
    },

    /// Sum the weighted elements into the checksum
    Sum,

    /// Reduce the checksum modulo `divisor` once it reaches `threshold`
    ModuloReduce { threshold: i64, divisor: i64 },

    /// Read the expected check digit from `value` at `position`
    ExtractCheckDigit { position: usize },

    /// Terminal accept when checksum and check digit both equal `value`
    EqualityShortCircuit { value: i64 },

    /// `minuend - checksum` must equal the check digit
    ComplementCompare { minuend: i64 },
}

impl StageSpec {
    /// Kebab-case stage name, matching the serialized tag.
    pub fn kind(&self) -> &'static str {
        match self {
            StageSpec::PatternMatch { .. } => "pattern-match",
            StageSpec::RegionMembership { .. } => "region-membership",
            StageSpec::Digitize => "digitize",
            StageSpec::SelectByIndex { .. } => "select-by-index",
            StageSpec::SubstringSlice { .. } => "substring-slice",
            StageSpec::WeightedMultiply { .. } => "weighted-multiply",
            StageSpec::ConditionalAdjust { .. } => "conditional-adjust",
            StageSpec::Sum => "sum",
            StageSpec::ModuloReduce { .. } => "modulo-reduce",
            StageSpec::ExtractCheckDigit { .. } => "extract-check-digit",
            StageSpec::EqualityShortCircuit { .. } => "equality-short-circuit",
            StageSpec::ComplementCompare { .. } => "complement-compare",
        }
    }
}
