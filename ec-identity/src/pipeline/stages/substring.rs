//! Substring extraction stage

use crate::document::IdentityDocument;
use crate::pipeline::stages::slice;
use crate::pipeline::{Flow, Runnable, StageError};

/// Replaces `value` with `value[start..end]`.
///
/// Used by the RUC pipeline to cut out the embedded cedula so another profile
/// can validate it.
#[derive(Debug, Clone)]
pub struct SubstringSlice {
    start: usize,
    end: usize,
}

impl SubstringSlice {
    pub fn new(start: usize, end: usize) -> Self {
        SubstringSlice { start, end }
    }
}

impl Runnable for SubstringSlice {
    fn name(&self) -> &'static str {
        "substring-slice"
    }

    fn run(&self, doc: &mut IdentityDocument) -> Result<Flow, StageError> {
        let extracted = slice(self.name(), &doc.value, self.start, self.end)?.to_string();
        doc.value = extracted;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_slice_replaces_value() {
        let mut doc = IdentityDocument::new("2222222222001");
        assert_eq!(
            SubstringSlice::new(0, 10).run(&mut doc),
            Ok(Flow::Continue)
        );
        assert_eq!(doc.value, "2222222222");
    }

    #[test]
    fn test_substring_slice_out_of_bounds() {
        let mut doc = IdentityDocument::new("12345");
        let err = SubstringSlice::new(0, 10).run(&mut doc).unwrap_err();
        assert_eq!(err.stage, "substring-slice");
        // value is not touched on failure
        assert_eq!(doc.value, "12345");
    }
}
