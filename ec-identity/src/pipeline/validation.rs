//! Lint pass over stage specs.
//!
//! Walks a spec list the way the driver would and flags combinations that
//! build fine but can never accept a document: mismatched list lengths, empty
//! ranges, stages reading fields nothing before them produces. The result is
//! advisory; the builder logs it and carries on.

use super::spec::StageSpec;
use std::fmt;

/// One suspicious spot in a spec list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecWarning {
    pub step_index: usize,
    pub message: String,
}

impl SpecWarning {
    fn new(step_index: usize, message: impl Into<String>) -> Self {
        Self {
            step_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for SpecWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Step {}: {}", self.step_index + 1, self.message)
    }
}

/// Fields a stage may leave behind, tracked while walking the specs
#[derive(Default)]
struct Produced {
    digits: bool,
    selected: Option<usize>,
    weighted: bool,
    checksum: bool,
    check_digit: bool,
}

/// Flag suspicious stage combinations without rejecting them
pub fn lint_specs(specs: &[StageSpec]) -> Vec<SpecWarning> {
    let mut warnings = Vec::new();
    let mut produced = Produced::default();

    for (idx, spec) in specs.iter().enumerate() {
        lint_step(spec, idx, &mut produced, &mut warnings);
    }

    warnings
}

fn lint_range(start: usize, end: usize, idx: usize, warnings: &mut Vec<SpecWarning>) {
    if start > end {
        warnings.push(SpecWarning::new(
            idx,
            format!("range [{start}, {end}) is inverted"),
        ));
    } else if start == end {
        warnings.push(SpecWarning::new(
            idx,
            format!("range [{start}, {end}) is empty"),
        ));
    }
}

fn lint_step(
    spec: &StageSpec,
    idx: usize,
    produced: &mut Produced,
    warnings: &mut Vec<SpecWarning>,
) {
    match spec {
        StageSpec::PatternMatch { .. } => {}
        StageSpec::RegionMembership {
            start,
            end,
            allowed,
        } => {
            lint_range(*start, *end, idx, warnings);
            if allowed.is_empty() {
                warnings.push(SpecWarning::new(idx, "allowed region set is empty"));
            }
        }
        StageSpec::Digitize => produced.digits = true,
        StageSpec::SelectByIndex { indices } => {
            if !produced.digits {
                warnings.push(SpecWarning::new(
                    idx,
                    "select-by-index without a preceding digitize",
                ));
            }
            if indices.iter().any(|i| *i < 0) {
                warnings.push(SpecWarning::new(
                    idx,
                    "negative indices are always skipped",
                ));
            }
            produced.selected = Some(indices.len());
        }
        StageSpec::SubstringSlice { start, end } => {
            lint_range(*start, *end, idx, warnings);
            // The new value has not been digitized yet
            *produced = Produced::default();
        }
        StageSpec::WeightedMultiply { coefficients } => {
            match produced.selected {
                Some(count) if count != coefficients.len() => {
                    warnings.push(SpecWarning::new(
                        idx,
                        format!(
                            "{} coefficients for {} selected indices",
                            coefficients.len(),
                            count
                        ),
                    ));
                }
                Some(_) => {}
                None => warnings.push(SpecWarning::new(
                    idx,
                    "weighted-multiply without a preceding select-by-index",
                )),
            }
            produced.weighted = true;
        }
        StageSpec::ConditionalAdjust { .. } => {
            if !produced.weighted {
                warnings.push(SpecWarning::new(
                    idx,
                    "conditional-adjust without a preceding weighted-multiply",
                ));
            }
        }
        StageSpec::Sum => {
            if !produced.weighted {
                warnings.push(SpecWarning::new(
                    idx,
                    "sum without a preceding weighted-multiply",
                ));
            }
            produced.checksum = true;
        }
        StageSpec::ModuloReduce { .. } => {
            if !produced.checksum {
                warnings.push(SpecWarning::new(
                    idx,
                    "modulo-reduce without a preceding sum",
                ));
            }
        }
        StageSpec::ExtractCheckDigit { .. } => produced.check_digit = true,
        StageSpec::EqualityShortCircuit { .. } | StageSpec::ComplementCompare { .. } => {
            if !produced.checksum {
                warnings.push(SpecWarning::new(
                    idx,
                    format!("{} without a preceding sum", spec.kind()),
                ));
            }
            if !produced.check_digit {
                warnings.push(SpecWarning::new(
                    idx,
                    format!("{} without a preceding extract-check-digit", spec.kind()),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn well_formed() -> Vec<StageSpec> {
        vec![
            StageSpec::PatternMatch {
                pattern: r"\d{4}".to_string(),
            },
            StageSpec::Digitize,
            StageSpec::SelectByIndex {
                indices: vec![0, 1, 2],
            },
            StageSpec::WeightedMultiply {
                coefficients: vec![2, 1, 2],
            },
            StageSpec::ConditionalAdjust {
                enabled: true,
                threshold: 10,
                subtrahend: 9,
            },
            StageSpec::Sum,
            StageSpec::ModuloReduce {
                threshold: 10,
                divisor: 10,
            },
            StageSpec::ExtractCheckDigit { position: 3 },
            StageSpec::EqualityShortCircuit { value: 0 },
            StageSpec::ComplementCompare { minuend: 10 },
        ]
    }

    #[test]
    fn test_well_formed_specs_have_no_warnings() {
        assert!(lint_specs(&well_formed()).is_empty());
    }

    #[test]
    fn test_coefficient_count_mismatch() {
        let mut specs = well_formed();
        specs[3] = StageSpec::WeightedMultiply {
            coefficients: vec![2, 1],
        };
        let warnings = lint_specs(&specs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].step_index, 3);
        assert_eq!(
            warnings[0].to_string(),
            "Step 4: 2 coefficients for 3 selected indices"
        );
    }

    #[test]
    fn test_empty_and_inverted_ranges() {
        let specs = vec![
            StageSpec::RegionMembership {
                start: 2,
                end: 2,
                allowed: BTreeSet::from(["17".to_string()]),
            },
            StageSpec::SubstringSlice { start: 5, end: 1 },
        ];
        let warnings = lint_specs(&specs);
        assert_eq!(warnings.len(), 2);
        assert!(warnings[0].message.contains("empty"));
        assert!(warnings[1].message.contains("inverted"));
    }

    #[test]
    fn test_sum_without_weighting() {
        let specs = vec![StageSpec::Digitize, StageSpec::Sum];
        let warnings = lint_specs(&specs);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].step_index, 1);
    }

    #[test]
    fn test_substring_resets_produced_fields() {
        let specs = vec![
            StageSpec::Digitize,
            StageSpec::SubstringSlice { start: 0, end: 2 },
            StageSpec::SelectByIndex { indices: vec![0] },
        ];
        let warnings = lint_specs(&specs);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("digitize"));
    }

    #[test]
    fn test_comparison_needs_checksum_and_check_digit() {
        let specs = vec![StageSpec::ComplementCompare { minuend: 10 }];
        let warnings = lint_specs(&specs);
        assert_eq!(warnings.len(), 2);
    }
}
