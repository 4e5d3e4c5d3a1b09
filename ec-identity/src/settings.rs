//! Typed settings parsed from the string-valued property set
//!
//! The config crate hands over every property as a string. This module turns
//! those strings into numbers, lists and sets once, at startup, so that a
//! malformed property is reported before any value is validated. Each settings
//! struct then knows the ordered [`StageSpec`] list of its profile.

use crate::pipeline::StageSpec;
use ec_identity_config::{CiProperties, RucNaturalProperties};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// A property whose string value cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsError {
    /// Fully qualified key, e.g. `ci.coefficient-list`
    pub key: String,
    pub value: String,
    pub reason: String,
}

impl SettingsError {
    fn new(key: &str, value: &str, reason: impl Into<String>) -> Self {
        SettingsError {
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid value {:?} for '{}': {}",
            self.value, self.key, self.reason
        )
    }
}

impl std::error::Error for SettingsError {}

fn parse_number<T>(key: &str, value: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| SettingsError::new(key, value, e.to_string()))
}

fn parse_bool(key: &str, value: &str) -> Result<bool, SettingsError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SettingsError::new(key, value, "expected true or false")),
    }
}

/// Comma-separated integers. A blank value is an empty list.
fn parse_number_list(key: &str, value: &str) -> Result<Vec<i64>, SettingsError> {
    if value.trim().is_empty() {
        return Ok(Vec::new());
    }
    value
        .split(',')
        .map(|item| {
            item.trim().parse().map_err(|e: std::num::ParseIntError| {
                SettingsError::new(key, value, format!("item {:?}: {}", item.trim(), e))
            })
        })
        .collect()
}

/// Comma-separated strings, trimmed; empty items are dropped.
fn parse_string_set(value: &str) -> BTreeSet<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parameters of the CI (cedula) checksum pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiSettings {
    pub pattern: String,
    pub province_start: usize,
    pub province_end: usize,
    pub provinces: BTreeSet<String>,
    pub indices: Vec<i64>,
    pub coefficients: Vec<i64>,
    pub adjust_enabled: bool,
    pub adjust_threshold: i64,
    pub adjust_subtrahend: i64,
    pub check_digit_position: usize,
    pub modulo_threshold: i64,
    pub modulo_divisor: i64,
    pub special_value: i64,
    pub minuend: i64,
}

impl CiSettings {
    pub fn from_properties(props: &CiProperties) -> Result<Self, SettingsError> {
        Ok(CiSettings {
            pattern: props.regexp.clone(),
            province_start: parse_number("ci.province-index-initial", &props.province_index_initial)?,
            province_end: parse_number("ci.province-index-final", &props.province_index_final)?,
            provinces: parse_string_set(&props.province_list),
            indices: parse_number_list("ci.index-list", &props.index_list)?,
            coefficients: parse_number_list("ci.coefficient-list", &props.coefficient_list)?,
            adjust_enabled: parse_bool("ci.adjuster", &props.adjuster)?,
            adjust_threshold: parse_number("ci.adjuster-max-value", &props.adjuster_max_value)?,
            adjust_subtrahend: parse_number("ci.adjuster-subtrahend", &props.adjuster_subtrahend)?,
            check_digit_position: parse_number(
                "ci.last-check-digit-index",
                &props.last_check_digit_index,
            )?,
            modulo_threshold: parse_number(
                "ci.last-check-digit-max-value",
                &props.last_check_digit_max_value,
            )?,
            modulo_divisor: parse_number(
                "ci.last-check-digit-divisor",
                &props.last_check_digit_divisor,
            )?,
            special_value: parse_number("ci.comparison-value", &props.comparison_value)?,
            minuend: parse_number("ci.comparison-minuend", &props.comparison_minuend)?,
        })
    }

    /// Stages of the CI pipeline, in execution order.
    pub fn stage_specs(&self) -> Vec<StageSpec> {
        vec![
            StageSpec::PatternMatch {
                pattern: self.pattern.clone(),
            },
            StageSpec::RegionMembership {
                start: self.province_start,
                end: self.province_end,
                allowed: self.provinces.clone(),
            },
            StageSpec::Digitize,
            StageSpec::SelectByIndex {
                indices: self.indices.clone(),
            },
            StageSpec::WeightedMultiply {
                coefficients: self.coefficients.clone(),
            },
            StageSpec::ConditionalAdjust {
                enabled: self.adjust_enabled,
                threshold: self.adjust_threshold,
                subtrahend: self.adjust_subtrahend,
            },
            StageSpec::Sum,
            StageSpec::ModuloReduce {
                threshold: self.modulo_threshold,
                divisor: self.modulo_divisor,
            },
            StageSpec::ExtractCheckDigit {
                position: self.check_digit_position,
            },
            StageSpec::EqualityShortCircuit {
                value: self.special_value,
            },
            StageSpec::ComplementCompare {
                minuend: self.minuend,
            },
        ]
    }
}

/// Parameters of the natural-person RUC pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RucNaturalSettings {
    pub pattern: String,
    pub ci_start: usize,
    pub ci_end: usize,
}

impl RucNaturalSettings {
    pub fn from_properties(props: &RucNaturalProperties) -> Result<Self, SettingsError> {
        Ok(RucNaturalSettings {
            pattern: props.regexp.clone(),
            ci_start: parse_number("ruc-natural.ci-index-initial", &props.ci_index_initial)?,
            ci_end: parse_number("ruc-natural.ci-index-final", &props.ci_index_final)?,
        })
    }

    /// Stages of the RUC pipeline. The embedded CI segment is checked separately.
    pub fn stage_specs(&self) -> Vec<StageSpec> {
        vec![
            StageSpec::PatternMatch {
                pattern: self.pattern.clone(),
            },
            StageSpec::SubstringSlice {
                start: self.ci_start,
                end: self.ci_end,
            },
        ]
    }
}
