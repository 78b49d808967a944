//! Presentation stage
//! Maps an edit script onto renderable segments and formatted reports

pub mod formatter;
pub mod report;

pub use formatter::{
    ConsoleFormatter, HtmlFormatter, JsonFormatter, MarkdownFormatter, OutputFormatter,
    ReportGenerator,
};
pub use report::{ComparisonReport, DiffStats};

use crate::diff::{self, DiffOp};
use crate::pipeline::Comparison;
use serde::{Deserialize, Serialize};

/// Style tag of one display segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Unchanged,
    Inserted,
    Deleted,
}

/// One renderable span of the comparison output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplaySegment {
    pub text: String,
    pub kind: SegmentKind,
}

/// Map a comparison onto display segments, in script order.
///
/// Total for every well-formed script; an inconsistent script is a
/// programming error upstream, caught by the debug assertion.
pub fn segments(comparison: &Comparison) -> Vec<DisplaySegment> {
    debug_assert_eq!(
        diff::restore_before(&comparison.ops),
        comparison.original.text,
        "edit script does not reproduce the original text"
    );
    debug_assert_eq!(
        diff::restore_after(&comparison.ops),
        comparison.target.text,
        "edit script does not reproduce the target text"
    );

    comparison
        .ops
        .iter()
        .map(|op| match op {
            DiffOp::Equal(text) => DisplaySegment {
                text: text.clone(),
                kind: SegmentKind::Unchanged,
            },
            DiffOp::Insert(text) => DisplaySegment {
                text: text.clone(),
                kind: SegmentKind::Inserted,
            },
            DiffOp::Delete(text) => DisplaySegment {
                text: text.clone(),
                kind: SegmentKind::Deleted,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractedText;

    fn comparison(a: &str, b: &str) -> Comparison {
        Comparison {
            ops: diff::diff(a, b, &Default::default()),
            original: ExtractedText::new(a.to_string(), Vec::new()),
            target: ExtractedText::new(b.to_string(), Vec::new()),
            original_name: "a.txt".to_string(),
            target_name: "b.txt".to_string(),
        }
    }

    #[test]
    fn test_segments_follow_script_order() {
        let cmp = comparison("Hello world", "Hello brave world");
        let segs = segments(&cmp);
        assert_eq!(
            segs,
            vec![
                DisplaySegment {
                    text: "Hello ".to_string(),
                    kind: SegmentKind::Unchanged
                },
                DisplaySegment {
                    text: "brave ".to_string(),
                    kind: SegmentKind::Inserted
                },
                DisplaySegment {
                    text: "world".to_string(),
                    kind: SegmentKind::Unchanged
                },
            ]
        );
    }

    #[test]
    fn test_identical_documents_single_unchanged_segment() {
        let cmp = comparison("same", "same");
        let segs = segments(&cmp);
        assert_eq!(segs.len(), 1);
        assert_eq!(segs[0].kind, SegmentKind::Unchanged);
    }
}
