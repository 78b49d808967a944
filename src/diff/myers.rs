//! Myers O(ND) edit-script engine over character sequences
//!
//! Works on `Vec<char>` internally so multi-byte text never splits a
//! code point. The line-mode fast path interns whole lines as synthetic
//! characters, diffs the line sequence with the same engine, then
//! re-diffs each changed region at character level.

use crate::diff::DiffOp;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Equal,
    Delete,
    Insert,
}

/// Internal edit-script element; the public `DiffOp` is built from these
/// at the module boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Chunk {
    pub tag: Tag,
    pub text: Vec<char>,
}

impl Chunk {
    pub fn new(tag: Tag, text: Vec<char>) -> Self {
        Self { tag, text }
    }

    pub fn from_slice(tag: Tag, text: &[char]) -> Self {
        Self { tag, text: text.to_vec() }
    }

    pub fn into_op(self) -> DiffOp {
        let text: String = self.text.into_iter().collect();
        match self.tag {
            Tag::Equal => DiffOp::Equal(text),
            Tag::Delete => DiffOp::Delete(text),
            Tag::Insert => DiffOp::Insert(text),
        }
    }
}

/// Length of the common prefix of two sequences.
pub(crate) fn common_prefix(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count()
}

/// Length of the common suffix of two sequences.
pub(crate) fn common_suffix(a: &[char], b: &[char]) -> usize {
    a.iter()
        .rev()
        .zip(b.iter().rev())
        .take_while(|(x, y)| x == y)
        .count()
}

/// First index of `needle` inside `haystack`, if any.
fn find_sub(haystack: &[char], needle: &[char]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Entry point: diff two character sequences.
pub(crate) fn diff_chars(a: &[char], b: &[char], check_lines: bool) -> Vec<Chunk> {
    if a == b {
        if a.is_empty() {
            return Vec::new();
        }
        return vec![Chunk::from_slice(Tag::Equal, a)];
    }

    // Peel off the common edges; only the middle needs real work.
    let prefix_len = common_prefix(a, b);
    let (a_rest, b_rest) = (&a[prefix_len..], &b[prefix_len..]);
    let suffix_len = common_suffix(a_rest, b_rest);
    let a_mid = &a_rest[..a_rest.len() - suffix_len];
    let b_mid = &b_rest[..b_rest.len() - suffix_len];

    let mut diffs = compute(a_mid, b_mid, check_lines);

    if prefix_len > 0 {
        diffs.insert(0, Chunk::from_slice(Tag::Equal, &a[..prefix_len]));
    }
    if suffix_len > 0 {
        diffs.push(Chunk::from_slice(
            Tag::Equal,
            &a_rest[a_rest.len() - suffix_len..],
        ));
    }
    diffs
}

/// Diff after common edges were removed.
fn compute(a: &[char], b: &[char], check_lines: bool) -> Vec<Chunk> {
    if a.is_empty() {
        return vec![Chunk::from_slice(Tag::Insert, b)];
    }
    if b.is_empty() {
        return vec![Chunk::from_slice(Tag::Delete, a)];
    }

    let (shorter, longer, shorter_is_a) = if a.len() <= b.len() {
        (a, b, true)
    } else {
        (b, a, false)
    };

    if let Some(at) = find_sub(longer, shorter) {
        // The shorter text sits whole inside the longer one.
        let surround_tag = if shorter_is_a { Tag::Insert } else { Tag::Delete };
        let mut diffs = Vec::new();
        if at > 0 {
            diffs.push(Chunk::from_slice(surround_tag, &longer[..at]));
        }
        diffs.push(Chunk::from_slice(Tag::Equal, shorter));
        if at + shorter.len() < longer.len() {
            diffs.push(Chunk::from_slice(surround_tag, &longer[at + shorter.len()..]));
        }
        return diffs;
    }

    if shorter.len() == 1 {
        // Single char with no whole-substring match: nothing to share.
        return vec![
            Chunk::from_slice(Tag::Delete, a),
            Chunk::from_slice(Tag::Insert, b),
        ];
    }

    if check_lines && a.len() > 100 && b.len() > 100 {
        return line_mode(a, b);
    }

    bisect(a, b)
}

/// Find the middle snake with simultaneous forward and reverse D-paths,
/// split there, and recurse on the halves.
fn bisect(a: &[char], b: &[char]) -> Vec<Chunk> {
    let a_len = a.len() as isize;
    let b_len = b.len() as isize;
    let max_d = (a_len + b_len + 1) / 2;
    let v_offset = max_d;
    let v_length = (2 * max_d + 1) as usize;

    let mut v1 = vec![-1isize; v_length];
    let mut v2 = vec![-1isize; v_length];
    v1[(v_offset + 1) as usize] = 0;
    v2[(v_offset + 1) as usize] = 0;

    let delta = a_len - b_len;
    // An odd delta means the paths can only meet on a forward step.
    let front = delta % 2 != 0;

    let mut k1start = 0isize;
    let mut k1end = 0isize;
    let mut k2start = 0isize;
    let mut k2end = 0isize;

    for d in 0..max_d {
        // Forward path.
        let mut k1 = -d + k1start;
        while k1 <= d - k1end {
            let k1_offset = (v_offset + k1) as usize;
            let mut x1 = if k1 == -d || (k1 != d && v1[k1_offset - 1] < v1[k1_offset + 1]) {
                v1[k1_offset + 1]
            } else {
                v1[k1_offset - 1] + 1
            };
            let mut y1 = x1 - k1;
            while x1 < a_len && y1 < b_len && a[x1 as usize] == b[y1 as usize] {
                x1 += 1;
                y1 += 1;
            }
            v1[k1_offset] = x1;

            if x1 > a_len {
                k1end += 2;
            } else if y1 > b_len {
                k1start += 2;
            } else if front {
                let k2_offset = v_offset + delta - k1;
                if k2_offset >= 0 && (k2_offset as usize) < v_length && v2[k2_offset as usize] != -1 {
                    let x2 = a_len - v2[k2_offset as usize];
                    if x1 >= x2 {
                        return bisect_split(a, b, x1 as usize, y1 as usize);
                    }
                }
            }
            k1 += 2;
        }

        // Reverse path.
        let mut k2 = -d + k2start;
        while k2 <= d - k2end {
            let k2_offset = (v_offset + k2) as usize;
            let mut x2 = if k2 == -d || (k2 != d && v2[k2_offset - 1] < v2[k2_offset + 1]) {
                v2[k2_offset + 1]
            } else {
                v2[k2_offset - 1] + 1
            };
            let mut y2 = x2 - k2;
            while x2 < a_len
                && y2 < b_len
                && a[(a_len - x2 - 1) as usize] == b[(b_len - y2 - 1) as usize]
            {
                x2 += 1;
                y2 += 1;
            }
            v2[k2_offset] = x2;

            if x2 > a_len {
                k2end += 2;
            } else if y2 > b_len {
                k2start += 2;
            } else if !front {
                let k1_offset = v_offset + delta - k2;
                if k1_offset >= 0 && (k1_offset as usize) < v_length && v1[k1_offset as usize] != -1 {
                    let x1 = v1[k1_offset as usize];
                    let y1 = v_offset + x1 - k1_offset;
                    let x2_mirror = a_len - x2;
                    if x1 >= x2_mirror {
                        return bisect_split(a, b, x1 as usize, y1 as usize);
                    }
                }
            }
            k2 += 2;
        }
    }

    // No commonality at all.
    vec![
        Chunk::from_slice(Tag::Delete, a),
        Chunk::from_slice(Tag::Insert, b),
    ]
}

fn bisect_split(a: &[char], b: &[char], x: usize, y: usize) -> Vec<Chunk> {
    let mut diffs = diff_chars(&a[..x], &b[..y], false);
    diffs.extend(diff_chars(&a[x..], &b[y..], false));
    diffs
}

/// Line-mode fast path: diff interned lines, then refine changed regions
/// character by character.
fn line_mode(a: &[char], b: &[char]) -> Vec<Chunk> {
    let a_text: String = a.iter().collect();
    let b_text: String = b.iter().collect();

    let mut interner = LineInterner::new();
    let a_encoded = interner.encode(&a_text);
    let b_encoded = interner.encode(&b_text);

    let encoded_diffs = diff_chars(&a_encoded, &b_encoded, false);

    // Expand interned lines back to their text.
    let decoded: Vec<Chunk> = encoded_diffs
        .into_iter()
        .map(|chunk| {
            let text: Vec<char> = chunk
                .text
                .iter()
                .flat_map(|symbol| interner.decode(*symbol).chars())
                .collect();
            Chunk::new(chunk.tag, text)
        })
        .collect();

    refine(decoded)
}

/// Re-diff every delete/insert pair at character granularity.
fn refine(diffs: Vec<Chunk>) -> Vec<Chunk> {
    let mut result = Vec::new();
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    let sentinel = Chunk::new(Tag::Equal, Vec::new());
    for chunk in diffs.into_iter().chain(std::iter::once(sentinel)) {
        match chunk.tag {
            Tag::Delete => text_delete.extend(chunk.text),
            Tag::Insert => text_insert.extend(chunk.text),
            Tag::Equal => {
                if !text_delete.is_empty() && !text_insert.is_empty() {
                    result.extend(diff_chars(&text_delete, &text_insert, false));
                } else if !text_delete.is_empty() {
                    result.push(Chunk::new(Tag::Delete, std::mem::take(&mut text_delete)));
                } else if !text_insert.is_empty() {
                    result.push(Chunk::new(Tag::Insert, std::mem::take(&mut text_insert)));
                }
                text_delete.clear();
                text_insert.clear();
                if !chunk.text.is_empty() {
                    result.push(chunk);
                }
            }
        }
    }

    result
}

/// Maps distinct lines to synthetic characters so whole lines can be
/// diffed as single symbols.
struct LineInterner {
    ids: HashMap<String, u32>,
    lines: Vec<String>,
}

impl LineInterner {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            lines: Vec::new(),
        }
    }

    fn encode(&mut self, text: &str) -> Vec<char> {
        let mut encoded = Vec::new();
        for line in split_keep_newlines(text) {
            let next_id = self.lines.len() as u32;
            let id = *self.ids.entry(line.to_string()).or_insert_with(|| {
                self.lines.push(line.to_string());
                next_id
            });
            encoded.push(id_to_char(id));
        }
        encoded
    }

    fn decode(&self, symbol: char) -> &str {
        &self.lines[char_to_id(symbol) as usize]
    }
}

/// Injective id -> char map that steps over the surrogate range.
fn id_to_char(id: u32) -> char {
    let code = if id < 0xD800 { id } else { id + 0x800 };
    char::from_u32(code).expect("line id out of range")
}

fn char_to_id(symbol: char) -> u32 {
    let code = symbol as u32;
    if code < 0xD800 { code } else { code - 0x800 }
}

/// Split into lines, each keeping its trailing newline.
fn split_keep_newlines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            lines.push(&text[start..=i]);
            start = i + 1;
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn concat(diffs: &[Chunk], include: Tag) -> String {
        diffs
            .iter()
            .filter(|c| c.tag == Tag::Equal || c.tag == include)
            .flat_map(|c| c.text.iter())
            .collect()
    }

    #[test]
    fn test_common_prefix_suffix() {
        assert_eq!(common_prefix(&chars("abcdef"), &chars("abcxyz")), 3);
        assert_eq!(common_prefix(&chars("abc"), &chars("xyz")), 0);
        assert_eq!(common_suffix(&chars("abcdef"), &chars("xyzdef")), 3);
        assert_eq!(common_suffix(&chars("abc"), &chars("xyz")), 0);
    }

    #[test]
    fn test_substring_shortcut() {
        let diffs = diff_chars(&chars("abc"), &chars("xabcy"), false);
        assert_eq!(concat(&diffs, Tag::Delete), "abc");
        assert_eq!(concat(&diffs, Tag::Insert), "xabcy");
    }

    #[test]
    fn test_bisect_reconstruction() {
        let a = chars("cat in the hat");
        let b = chars("dog in the fog");
        let diffs = diff_chars(&a, &b, false);
        assert_eq!(concat(&diffs, Tag::Delete), "cat in the hat");
        assert_eq!(concat(&diffs, Tag::Insert), "dog in the fog");
    }

    #[test]
    fn test_no_commonality() {
        let diffs = diff_chars(&chars("aaa"), &chars("zzz"), false);
        assert_eq!(
            diffs,
            vec![
                Chunk::new(Tag::Delete, chars("aaa")),
                Chunk::new(Tag::Insert, chars("zzz")),
            ]
        );
    }

    #[test]
    fn test_split_keep_newlines() {
        assert_eq!(split_keep_newlines("a\nb\nc"), vec!["a\n", "b\n", "c"]);
        assert_eq!(split_keep_newlines("a\n"), vec!["a\n"]);
        assert_eq!(split_keep_newlines(""), Vec::<&str>::new());
    }

    #[test]
    fn test_interner_round_trip() {
        let mut interner = LineInterner::new();
        let encoded = interner.encode("alpha\nbeta\nalpha\n");
        assert_eq!(encoded.len(), 3);
        assert_eq!(encoded[0], encoded[2]);
        let decoded: String = encoded.iter().map(|c| interner.decode(*c)).collect();
        assert_eq!(decoded, "alpha\nbeta\nalpha\n");
    }

    #[test]
    fn test_id_char_map_skips_surrogates() {
        for id in [0, 100, 0xD7FF, 0xD800, 0xF000, 0x20000] {
            assert_eq!(char_to_id(id_to_char(id)), id);
        }
    }

    #[test]
    fn test_unicode_never_splits() {
        let a = chars("caffè");
        let b = chars("caffé");
        let diffs = diff_chars(&a, &b, false);
        assert_eq!(concat(&diffs, Tag::Delete), "caffè");
        assert_eq!(concat(&diffs, Tag::Insert), "caffé");
    }
}
