//! Edit-script computation between two texts
//!
//! The engine follows the classic Myers bisect construction: trim the
//! common edges, split on the middle snake, recurse, then run cleanup
//! passes that improve readability without changing what the script
//! reconstructs. Output is deterministic for fixed inputs.

pub mod cleanup;
pub mod myers;

use crate::config::DiffConfig;
use serde::{Deserialize, Serialize};

/// One operation of an edit script.
///
/// Concatenating the before side (Equal + Delete) of a script reproduces
/// the original text; the after side (Equal + Insert) reproduces the
/// revised text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", content = "text")]
pub enum DiffOp {
    Equal(String),
    Insert(String),
    Delete(String),
}

impl DiffOp {
    pub fn text(&self) -> &str {
        match self {
            DiffOp::Equal(t) | DiffOp::Insert(t) | DiffOp::Delete(t) => t,
        }
    }

    pub fn is_equal(&self) -> bool {
        matches!(self, DiffOp::Equal(_))
    }
}

/// Knobs for one diff run.
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Line-level first pass before character-level refinement
    pub check_lines: bool,
    /// Merge spurious short matches into the surrounding edits
    pub semantic_cleanup: bool,
    /// Trade boundary exactness for fewer, larger ops
    pub efficiency_cleanup: bool,
    /// Cost of an empty edit op, in characters, for the efficiency pass
    pub edit_cost: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            check_lines: true,
            semantic_cleanup: true,
            efficiency_cleanup: true,
            edit_cost: 4,
        }
    }
}

impl From<&DiffConfig> for DiffOptions {
    fn from(config: &DiffConfig) -> Self {
        Self {
            check_lines: config.check_lines,
            semantic_cleanup: config.semantic_cleanup,
            efficiency_cleanup: config.efficiency_cleanup,
            edit_cost: config.edit_cost,
        }
    }
}

/// Compute an edit script transforming `a` into `b`.
pub fn diff(a: &str, b: &str, options: &DiffOptions) -> Vec<DiffOp> {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();

    let mut chunks = myers::diff_chars(&a_chars, &b_chars, options.check_lines);
    cleanup::cleanup_merge(&mut chunks);

    if options.semantic_cleanup {
        cleanup::cleanup_semantic(&mut chunks);
    }
    if options.efficiency_cleanup {
        cleanup::cleanup_efficiency(&mut chunks, options.edit_cost);
    }

    chunks.into_iter().map(myers::Chunk::into_op).collect()
}

/// Reconstruct the original text from a script.
pub fn restore_before(ops: &[DiffOp]) -> String {
    let mut text = String::new();
    for op in ops {
        match op {
            DiffOp::Equal(t) | DiffOp::Delete(t) => text.push_str(t),
            DiffOp::Insert(_) => {}
        }
    }
    text
}

/// Reconstruct the revised text from a script.
pub fn restore_after(ops: &[DiffOp]) -> String {
    let mut text = String::new();
    for op in ops {
        match op {
            DiffOp::Equal(t) | DiffOp::Insert(t) => text.push_str(t),
            DiffOp::Delete(_) => {}
        }
    }
    text
}

/// Swap insertions and deletions, yielding a script from `b` back to `a`.
pub fn invert(ops: &[DiffOp]) -> Vec<DiffOp> {
    ops.iter()
        .map(|op| match op {
            DiffOp::Equal(t) => DiffOp::Equal(t.clone()),
            DiffOp::Insert(t) => DiffOp::Delete(t.clone()),
            DiffOp::Delete(t) => DiffOp::Insert(t.clone()),
        })
        .collect()
}

/// Levenshtein distance implied by a script: the larger side of each
/// adjacent insert/delete group.
pub fn levenshtein(ops: &[DiffOp]) -> usize {
    let mut distance = 0;
    let mut insertions = 0;
    let mut deletions = 0;

    for op in ops {
        match op {
            DiffOp::Insert(t) => insertions += t.chars().count(),
            DiffOp::Delete(t) => deletions += t.chars().count(),
            DiffOp::Equal(_) => {
                distance += insertions.max(deletions);
                insertions = 0;
                deletions = 0;
            }
        }
    }
    distance + insertions.max(deletions)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_reconstructs(a: &str, b: &str, ops: &[DiffOp]) {
        assert_eq!(restore_before(ops), a, "before side must reproduce A");
        assert_eq!(restore_after(ops), b, "after side must reproduce B");
    }

    #[test]
    fn test_identical_inputs_single_equal() {
        let ops = diff("Hello world", "Hello world", &DiffOptions::default());
        assert_eq!(ops, vec![DiffOp::Equal("Hello world".to_string())]);
    }

    #[test]
    fn test_both_empty() {
        let ops = diff("", "", &DiffOptions::default());
        assert!(ops.is_empty());
    }

    #[test]
    fn test_insert_only() {
        let ops = diff("", "abc", &DiffOptions::default());
        assert_eq!(ops, vec![DiffOp::Insert("abc".to_string())]);
    }

    #[test]
    fn test_delete_only() {
        let ops = diff("abc", "", &DiffOptions::default());
        assert_eq!(ops, vec![DiffOp::Delete("abc".to_string())]);
    }

    #[test]
    fn test_hello_brave_world() {
        let ops = diff("Hello world", "Hello brave world", &DiffOptions::default());
        assert_reconstructs("Hello world", "Hello brave world", &ops);
        assert_eq!(
            ops,
            vec![
                DiffOp::Equal("Hello ".to_string()),
                DiffOp::Insert("brave ".to_string()),
                DiffOp::Equal("world".to_string()),
            ]
        );
    }

    #[test]
    fn test_reconstruction_invariant_various_pairs() {
        let cases = [
            ("", "abc"),
            ("abc", ""),
            ("abc", "abc"),
            ("kitten", "sitting"),
            ("The quick brown fox", "The slow brown dog"),
            ("a\nb\nc\n", "a\nx\nc\n"),
            ("mañana café", "manana cafe"),
            ("1234567890", "0987654321"),
        ];

        for (a, b) in cases {
            for check_lines in [false, true] {
                let options = DiffOptions {
                    check_lines,
                    ..Default::default()
                };
                let ops = diff(a, b, &options);
                assert_reconstructs(a, b, &ops);
            }
        }
    }

    #[test]
    fn test_invert_produces_valid_reverse_script() {
        let a = "The terms of this agreement are final.";
        let b = "The revised terms of this contract are binding.";
        let ops = diff(a, b, &DiffOptions::default());
        let inverted = invert(&ops);
        assert_eq!(restore_before(&inverted), b);
        assert_eq!(restore_after(&inverted), a);
    }

    #[test]
    fn test_determinism() {
        let a = "one two three four five";
        let b = "one 2 three quatro five";
        let first = diff(a, b, &DiffOptions::default());
        for _ in 0..3 {
            assert_eq!(diff(a, b, &DiffOptions::default()), first);
        }
    }

    #[test]
    fn test_levenshtein_from_ops() {
        let ops = diff("kitten", "sitting", &DiffOptions::default());
        // Classic distance is 3; cleanup may merge boundaries but the
        // implied distance never drops below it.
        assert!(levenshtein(&ops) >= 3);
        assert_eq!(levenshtein(&[DiffOp::Equal("same".to_string())]), 0);
    }

    #[test]
    fn test_line_mode_matches_reconstruction_on_large_text() {
        let a: String = (0..200)
            .map(|i| format!("clause {} stays the same\n", i))
            .collect();
        let mut b = a.replace("clause 50 stays the same", "clause 50 was rewritten entirely");
        b.push_str("clause 200 appended at the end\n");

        let ops = diff(&a, &b, &DiffOptions::default());
        assert_reconstructs(&a, &b, &ops);
        // Most of the text is untouched, so most ops must be Equal.
        let equal_len: usize = ops
            .iter()
            .filter(|op| op.is_equal())
            .map(|op| op.text().len())
            .sum();
        assert!(equal_len > a.len() / 2);
    }
}
