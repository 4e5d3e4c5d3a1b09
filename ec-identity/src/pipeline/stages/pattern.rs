//! Input-shape stages: whole-value pattern and region allow-list

use crate::document::IdentityDocument;
use crate::pipeline::stages::slice;
use crate::pipeline::{Flow, Runnable, StageError};
use regex::Regex;
use std::collections::BTreeSet;

/// Requires the whole value to match a regular expression.
///
/// The configured pattern is wrapped in `^(?:...)$`, so `\d{10}` behaves the
/// same as `^\d{10}$`.
#[derive(Debug, Clone)]
pub struct PatternMatch {
    source: String,
    regex: Regex,
}

impl PatternMatch {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})$", pattern))?;
        Ok(PatternMatch {
            source: pattern.to_string(),
            regex,
        })
    }

    /// The pattern as configured, before anchoring.
    pub fn pattern(&self) -> &str {
        &self.source
    }
}

impl Runnable for PatternMatch {
    fn name(&self) -> &'static str {
        "pattern-match"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        if !self.regex.is_match(&doc.value) {
            return Err(StageError::new(
                self.name(),
                "value does not match the configured pattern",
            ));
        }
        Ok(Flow::Continue)
    }
}

/// Requires `value[start..end]` to be one of an allowed set of codes
/// (province codes, for the cedula).
#[derive(Debug, Clone)]
pub struct RegionMembership {
    start: usize,
    end: usize,
    allowed: BTreeSet<String>,
}

impl RegionMembership {
    pub fn new(start: usize, end: usize, allowed: BTreeSet<String>) -> Self {
        RegionMembership {
            start,
            end,
            allowed,
        }
    }
}

impl Runnable for RegionMembership {
    fn name(&self) -> &'static str {
        "region-membership"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let code = slice(self.name(), &doc.value, self.start, self.end)?;
        if !self.allowed.contains(code) {
            return Err(StageError::new(
                self.name(),
                format!("region code {:?} is not allowed", code),
            ));
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provinces() -> BTreeSet<String> {
        ["01", "17", "24"].iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_match_accepts_full_match() {
        let stage = PatternMatch::new(r"\d{4}").unwrap();
        let mut doc = IdentityDocument::new("1234");
        assert_eq!(stage.run(&mut doc), Ok(Flow::Continue));
    }

    #[test]
    fn test_pattern_match_rejects_partial_match() {
        // An unanchored search would find "1234" inside the value
        let stage = PatternMatch::new(r"\d{4}").unwrap();
        let mut doc = IdentityDocument::new("12345");
        let err = stage.run(&mut doc).unwrap_err();
        assert_eq!(err.stage, "pattern-match");
    }

    #[test]
    fn test_pattern_match_already_anchored() {
        let stage = PatternMatch::new(r"^\d{10}$").unwrap();
        assert!(stage.run(&mut IdentityDocument::new("2222222222")).is_ok());
        assert!(stage.run(&mut IdentityDocument::new("1")).is_err());
    }

    #[test]
    fn test_pattern_match_alternation_is_anchored_as_a_whole() {
        let stage = PatternMatch::new("a|b").unwrap();
        assert!(stage.run(&mut IdentityDocument::new("a")).is_ok());
        assert!(stage.run(&mut IdentityDocument::new("ab")).is_err());
    }

    #[test]
    fn test_pattern_match_keeps_source() {
        let stage = PatternMatch::new(r"\d+").unwrap();
        assert_eq!(stage.pattern(), r"\d+");
    }

    #[test]
    fn test_pattern_match_invalid_regex() {
        assert!(PatternMatch::new("(").is_err());
    }

    #[test]
    fn test_region_membership_allowed() {
        let stage = RegionMembership::new(0, 2, provinces());
        let mut doc = IdentityDocument::new("1712345678");
        assert_eq!(stage.run(&mut doc), Ok(Flow::Continue));
    }

    #[test]
    fn test_region_membership_not_allowed() {
        let stage = RegionMembership::new(0, 2, provinces());
        let mut doc = IdentityDocument::new("9912345678");
        let err = stage.run(&mut doc).unwrap_err();
        assert!(err.reason.contains("\"99\""));
    }

    #[test]
    fn test_region_membership_short_value() {
        let stage = RegionMembership::new(0, 2, provinces());
        let mut doc = IdentityDocument::new("1");
        assert!(stage.run(&mut doc).is_err());
    }
}
