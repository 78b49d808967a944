//! Edit-script cleanup passes
//!
//! Every pass preserves what the script reconstructs; they only reshape
//! op boundaries for readability or economy. `cleanup_merge` is the
//! canonicalization step the others rely on and re-run after rewriting.

use crate::diff::myers::{common_prefix, common_suffix, Chunk, Tag};

fn ends_with(haystack: &[char], needle: &[char]) -> bool {
    haystack.len() >= needle.len() && haystack[haystack.len() - needle.len()..] == *needle
}

fn starts_with(haystack: &[char], needle: &[char]) -> bool {
    haystack.len() >= needle.len() && haystack[..needle.len()] == *needle
}

/// Longest suffix of `a` that is also a prefix of `b`.
fn common_overlap(a: &[char], b: &[char]) -> usize {
    let max = a.len().min(b.len());
    for k in (1..=max).rev() {
        if a[a.len() - k..] == b[..k] {
            return k;
        }
    }
    0
}

/// Coalesce adjacent ops of one kind, factor shared edges out of
/// delete/insert pairs, and slide single edits to merge equalities.
pub(crate) fn cleanup_merge(diffs: &mut Vec<Chunk>) {
    if diffs.is_empty() {
        return;
    }

    diffs.push(Chunk::new(Tag::Equal, Vec::new()));

    let mut pointer = 0usize;
    let mut count_delete = 0usize;
    let mut count_insert = 0usize;
    let mut text_delete: Vec<char> = Vec::new();
    let mut text_insert: Vec<char> = Vec::new();

    while pointer < diffs.len() {
        match diffs[pointer].tag {
            Tag::Insert => {
                count_insert += 1;
                text_insert.extend(diffs[pointer].text.iter().copied());
                pointer += 1;
            }
            Tag::Delete => {
                count_delete += 1;
                text_delete.extend(diffs[pointer].text.iter().copied());
                pointer += 1;
            }
            Tag::Equal => {
                if count_delete + count_insert > 1 {
                    if count_delete != 0 && count_insert != 0 {
                        // Factor out a shared prefix of the merged pair.
                        let prefix = common_prefix(&text_insert, &text_delete);
                        if prefix > 0 {
                            let start = pointer - count_delete - count_insert;
                            if start > 0 && diffs[start - 1].tag == Tag::Equal {
                                diffs[start - 1]
                                    .text
                                    .extend(text_insert[..prefix].iter().copied());
                            } else {
                                diffs.insert(
                                    0,
                                    Chunk::new(Tag::Equal, text_insert[..prefix].to_vec()),
                                );
                                pointer += 1;
                            }
                            text_insert.drain(..prefix);
                            text_delete.drain(..prefix);
                        }
                        // And a shared suffix, onto the upcoming equality.
                        let suffix = common_suffix(&text_insert, &text_delete);
                        if suffix > 0 {
                            let mut merged =
                                text_insert[text_insert.len() - suffix..].to_vec();
                            merged.extend(diffs[pointer].text.iter().copied());
                            diffs[pointer].text = merged;
                            text_insert.truncate(text_insert.len() - suffix);
                            text_delete.truncate(text_delete.len() - suffix);
                        }
                    }

                    let start = pointer - count_delete - count_insert;
                    let mut replacement = Vec::new();
                    if !text_delete.is_empty() {
                        replacement.push(Chunk::new(Tag::Delete, text_delete.clone()));
                    }
                    if !text_insert.is_empty() {
                        replacement.push(Chunk::new(Tag::Insert, text_insert.clone()));
                    }
                    let replaced = replacement.len();
                    diffs.splice(start..pointer, replacement);
                    pointer = start + replaced + 1;
                } else if pointer != 0 && diffs[pointer - 1].tag == Tag::Equal {
                    let text = std::mem::take(&mut diffs[pointer].text);
                    diffs[pointer - 1].text.extend(text);
                    diffs.remove(pointer);
                } else {
                    pointer += 1;
                }
                count_insert = 0;
                count_delete = 0;
                text_delete.clear();
                text_insert.clear();
            }
        }
    }

    if diffs
        .last()
        .map_or(false, |c| c.tag == Tag::Equal && c.text.is_empty())
    {
        diffs.pop();
    }

    // Second pass: a single edit surrounded by equalities can sometimes
    // be shifted sideways so the equalities merge.
    let mut changes = false;
    let mut pointer = 1usize;
    while diffs.len() >= 3 && pointer < diffs.len() - 1 {
        if diffs[pointer - 1].tag == Tag::Equal && diffs[pointer + 1].tag == Tag::Equal {
            let prev = diffs[pointer - 1].text.clone();
            let edit = diffs[pointer].text.clone();
            let next = diffs[pointer + 1].text.clone();

            if ends_with(&edit, &prev) {
                let mut shifted = prev.clone();
                shifted.extend_from_slice(&edit[..edit.len() - prev.len()]);
                diffs[pointer].text = shifted;

                let mut merged = prev;
                merged.extend_from_slice(&next);
                diffs[pointer + 1].text = merged;

                diffs.remove(pointer - 1);
                changes = true;
            } else if starts_with(&edit, &next) {
                diffs[pointer - 1].text.extend_from_slice(&next);

                let mut shifted = edit[next.len()..].to_vec();
                shifted.extend_from_slice(&next);
                diffs[pointer].text = shifted;

                diffs.remove(pointer + 1);
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

/// Eliminate short equalities dominated by the edits around them, align
/// edit boundaries to semantic edges, and surface edit overlaps.
pub(crate) fn cleanup_semantic(diffs: &mut Vec<Chunk>) {
    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    let mut length_insertions1 = 0usize;
    let mut length_deletions1 = 0usize;
    let mut length_insertions2 = 0usize;
    let mut length_deletions2 = 0usize;
    let mut pointer: isize = 0;

    while (pointer as usize) < diffs.len() {
        let p = pointer as usize;
        if diffs[p].tag == Tag::Equal {
            equalities.push(p);
            length_insertions1 = length_insertions2;
            length_deletions1 = length_deletions2;
            length_insertions2 = 0;
            length_deletions2 = 0;
            last_equality = Some(diffs[p].text.clone());
        } else {
            if diffs[p].tag == Tag::Insert {
                length_insertions2 += diffs[p].text.len();
            } else {
                length_deletions2 += diffs[p].text.len();
            }
            let eliminate = match &last_equality {
                Some(eq) => {
                    eq.len() <= length_insertions1.max(length_deletions1)
                        && eq.len() <= length_insertions2.max(length_deletions2)
                }
                None => false,
            };
            if eliminate {
                let eq_text = last_equality.take().unwrap();
                let idx = *equalities.last().unwrap();
                diffs[idx].tag = Tag::Delete;
                diffs.insert(idx + 1, Chunk::new(Tag::Insert, eq_text));

                equalities.pop();
                equalities.pop();
                pointer = equalities.last().map(|&x| x as isize).unwrap_or(-1);
                length_insertions1 = 0;
                length_deletions1 = 0;
                length_insertions2 = 0;
                length_deletions2 = 0;
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
    cleanup_semantic_lossless(diffs);

    // Surface overlaps between adjacent deletions and insertions:
    // Delete "abcxxx" + Insert "xxxdef" shares an "xxx" worth keeping.
    let mut pointer = 1usize;
    while pointer < diffs.len() {
        if diffs[pointer - 1].tag == Tag::Delete && diffs[pointer].tag == Tag::Insert {
            let deletion = diffs[pointer - 1].text.clone();
            let insertion = diffs[pointer].text.clone();
            let overlap1 = common_overlap(&deletion, &insertion);
            let overlap2 = common_overlap(&insertion, &deletion);

            if overlap1 >= overlap2 {
                if overlap1 * 2 >= deletion.len() || overlap1 * 2 >= insertion.len() {
                    diffs.insert(
                        pointer,
                        Chunk::new(Tag::Equal, insertion[..overlap1].to_vec()),
                    );
                    diffs[pointer - 1].text = deletion[..deletion.len() - overlap1].to_vec();
                    diffs[pointer + 1].text = insertion[overlap1..].to_vec();
                    pointer += 1;
                }
            } else if overlap2 * 2 >= deletion.len() || overlap2 * 2 >= insertion.len() {
                // The insertion ends where the deletion starts.
                diffs.insert(
                    pointer,
                    Chunk::new(Tag::Equal, deletion[..overlap2].to_vec()),
                );
                diffs[pointer - 1] =
                    Chunk::new(Tag::Insert, insertion[..insertion.len() - overlap2].to_vec());
                diffs[pointer + 1] = Chunk::new(Tag::Delete, deletion[overlap2..].to_vec());
                pointer += 1;
            }
            pointer += 1;
        }
        pointer += 1;
    }

    diffs.retain(|c| !c.text.is_empty());
    cleanup_merge(diffs);
}

/// Slide each edit that sits between two equalities to the position with
/// the best semantic score. Lossless: reconstruction is unchanged.
fn cleanup_semantic_lossless(diffs: &mut Vec<Chunk>) {
    let mut pointer = 1usize;
    while !diffs.is_empty() && pointer + 1 < diffs.len() {
        if diffs[pointer - 1].tag == Tag::Equal && diffs[pointer + 1].tag == Tag::Equal {
            let mut equality1 = diffs[pointer - 1].text.clone();
            let mut edit = diffs[pointer].text.clone();
            let mut equality2 = diffs[pointer + 1].text.clone();

            // Slide the edit as far left as it can go.
            let offset = common_suffix(&equality1, &edit);
            if offset > 0 {
                let common: Vec<char> = edit[edit.len() - offset..].to_vec();
                equality1.truncate(equality1.len() - offset);

                let mut shifted = common.clone();
                shifted.extend_from_slice(&edit[..edit.len() - offset]);
                edit = shifted;

                let mut prefixed = common;
                prefixed.extend_from_slice(&equality2);
                equality2 = prefixed;
            }

            // Then walk right, keeping the best-scoring position.
            let mut best_equality1 = equality1.clone();
            let mut best_edit = edit.clone();
            let mut best_equality2 = equality2.clone();
            let mut best_score =
                semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);

            while !edit.is_empty() && !equality2.is_empty() && edit[0] == equality2[0] {
                equality1.push(edit[0]);
                edit.remove(0);
                edit.push(equality2[0]);
                equality2.remove(0);

                let score =
                    semantic_score(&equality1, &edit) + semantic_score(&edit, &equality2);
                if score >= best_score {
                    best_score = score;
                    best_equality1 = equality1.clone();
                    best_edit = edit.clone();
                    best_equality2 = equality2.clone();
                }
            }

            if diffs[pointer - 1].text != best_equality1 {
                if !best_equality1.is_empty() {
                    diffs[pointer - 1].text = best_equality1;
                } else {
                    diffs.remove(pointer - 1);
                    pointer -= 1;
                }
                diffs[pointer].text = best_edit;
                if !best_equality2.is_empty() {
                    diffs[pointer + 1].text = best_equality2;
                } else {
                    diffs.remove(pointer + 1);
                    pointer = pointer.saturating_sub(1);
                }
            }
        }
        pointer += 1;
    }
}

/// Score a boundary between two texts: higher means a more natural place
/// to cut (word edge beats mid-word, line break beats word edge).
fn semantic_score(one: &[char], two: &[char]) -> usize {
    if one.is_empty() || two.is_empty() {
        // Edges of the text are the best boundaries of all.
        return 6;
    }

    let char1 = *one.last().unwrap();
    let char2 = two[0];
    let non_alnum1 = !char1.is_alphanumeric();
    let non_alnum2 = !char2.is_alphanumeric();
    let whitespace1 = non_alnum1 && char1.is_whitespace();
    let whitespace2 = non_alnum2 && char2.is_whitespace();
    let line_break1 = whitespace1 && (char1 == '\n' || char1 == '\r');
    let line_break2 = whitespace2 && (char2 == '\n' || char2 == '\r');
    let blank_line1 = line_break1
        && (ends_with(one, &['\n', '\n']) || ends_with(one, &['\n', '\r', '\n']));
    let blank_line2 = line_break2
        && (starts_with(two, &['\n', '\n'])
            || starts_with(two, &['\r', '\n', '\r', '\n'])
            || starts_with(two, &['\n', '\r', '\n'])
            || starts_with(two, &['\r', '\n', '\n']));

    if blank_line1 || blank_line2 {
        5
    } else if line_break1 || line_break2 {
        4
    } else if non_alnum1 && !whitespace1 && whitespace2 {
        // End of sentence.
        3
    } else if whitespace1 || whitespace2 {
        2
    } else if non_alnum1 || non_alnum2 {
        1
    } else {
        0
    }
}

/// Eliminate operationally expensive equalities: short matches that keep
/// four (or three cheap) edit ops alive where two would do.
pub(crate) fn cleanup_efficiency(diffs: &mut Vec<Chunk>, edit_cost: usize) {
    if diffs.is_empty() {
        return;
    }

    let mut changes = false;
    let mut equalities: Vec<usize> = Vec::new();
    let mut last_equality: Option<Vec<char>> = None;
    // Is there an insertion/deletion before/after the candidate equality?
    let mut pre_ins = false;
    let mut pre_del = false;
    let mut post_ins = false;
    let mut post_del = false;
    let mut pointer: isize = 0;

    while (pointer as usize) < diffs.len() {
        let p = pointer as usize;
        if diffs[p].tag == Tag::Equal {
            if diffs[p].text.len() < edit_cost && (post_ins || post_del) {
                equalities.push(p);
                pre_ins = post_ins;
                pre_del = post_del;
                last_equality = Some(diffs[p].text.clone());
            } else {
                equalities.clear();
                last_equality = None;
            }
            post_ins = false;
            post_del = false;
        } else {
            if diffs[p].tag == Tag::Delete {
                post_del = true;
            } else {
                post_ins = true;
            }

            // Five types to be split:
            // <ins>A</ins><del>B</del>XY<ins>C</ins><del>D</del>
            // <ins>A</ins>X<ins>C</ins><del>D</del>
            // <ins>A</ins><del>B</del>X<ins>C</ins>
            // <ins>A</del>X<ins>C</ins><del>D</del>
            // <ins>A</ins><del>B</del>X<del>C</del>
            let flag_count = pre_ins as usize
                + pre_del as usize
                + post_ins as usize
                + post_del as usize;
            let split = match &last_equality {
                Some(eq) => {
                    (pre_ins && pre_del && post_ins && post_del)
                        || (eq.len() < edit_cost / 2 && flag_count == 3)
                }
                None => false,
            };
            if split {
                let eq_text = last_equality.take().unwrap();
                let idx = *equalities.last().unwrap();
                diffs[idx].tag = Tag::Delete;
                diffs.insert(idx + 1, Chunk::new(Tag::Insert, eq_text));
                equalities.pop();

                if pre_ins && pre_del {
                    post_ins = true;
                    post_del = true;
                    equalities.clear();
                } else {
                    equalities.pop();
                    pointer = equalities.last().map(|&x| x as isize).unwrap_or(-1);
                    post_ins = false;
                    post_del = false;
                }
                changes = true;
            }
        }
        pointer += 1;
    }

    if changes {
        cleanup_merge(diffs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(tag: Tag, text: &str) -> Chunk {
        Chunk::new(tag, text.chars().collect())
    }

    fn texts(diffs: &[Chunk]) -> Vec<(Tag, String)> {
        diffs
            .iter()
            .map(|c| (c.tag, c.text.iter().collect()))
            .collect()
    }

    #[test]
    fn test_merge_no_change_needed() {
        let mut diffs = vec![
            chunk(Tag::Equal, "a"),
            chunk(Tag::Delete, "b"),
            chunk(Tag::Insert, "c"),
        ];
        let expected = diffs.clone();
        cleanup_merge(&mut diffs);
        assert_eq!(diffs, expected);
    }

    #[test]
    fn test_merge_consecutive_equalities() {
        let mut diffs = vec![
            chunk(Tag::Equal, "a"),
            chunk(Tag::Equal, "b"),
            chunk(Tag::Equal, "c"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(texts(&diffs), vec![(Tag::Equal, "abc".to_string())]);
    }

    #[test]
    fn test_merge_factors_shared_edges() {
        let mut diffs = vec![
            chunk(Tag::Delete, "a"),
            chunk(Tag::Insert, "abc"),
            chunk(Tag::Delete, "dc"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Equal, "a".to_string()),
                (Tag::Delete, "d".to_string()),
                (Tag::Insert, "b".to_string()),
                (Tag::Equal, "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_slides_edit_left() {
        let mut diffs = vec![
            chunk(Tag::Equal, "a"),
            chunk(Tag::Insert, "ba"),
            chunk(Tag::Equal, "c"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Insert, "ab".to_string()),
                (Tag::Equal, "ac".to_string()),
            ]
        );
    }

    #[test]
    fn test_merge_slides_edit_right() {
        let mut diffs = vec![
            chunk(Tag::Equal, "c"),
            chunk(Tag::Insert, "ab"),
            chunk(Tag::Equal, "a"),
        ];
        cleanup_merge(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Equal, "ca".to_string()),
                (Tag::Insert, "ba".to_string()),
            ]
        );
    }

    #[test]
    fn test_semantic_no_elimination() {
        let mut diffs = vec![
            chunk(Tag::Delete, "ab"),
            chunk(Tag::Equal, "cd"),
            chunk(Tag::Delete, "e"),
        ];
        let expected = diffs.clone();
        cleanup_semantic(&mut diffs);
        assert_eq!(diffs, expected);
    }

    #[test]
    fn test_semantic_simple_elimination() {
        let mut diffs = vec![
            chunk(Tag::Delete, "a"),
            chunk(Tag::Equal, "b"),
            chunk(Tag::Delete, "c"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Delete, "abc".to_string()),
                (Tag::Insert, "b".to_string()),
            ]
        );
    }

    #[test]
    fn test_semantic_backpass_elimination() {
        let mut diffs = vec![
            chunk(Tag::Delete, "ab"),
            chunk(Tag::Equal, "cd"),
            chunk(Tag::Delete, "e"),
            chunk(Tag::Equal, "f"),
            chunk(Tag::Insert, "g"),
        ];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Delete, "abcdef".to_string()),
                (Tag::Insert, "cdfg".to_string()),
            ]
        );
    }

    #[test]
    fn test_semantic_overlap_elimination() {
        let mut diffs = vec![chunk(Tag::Delete, "abcxxx"), chunk(Tag::Insert, "xxxdef")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Delete, "abc".to_string()),
                (Tag::Equal, "xxx".to_string()),
                (Tag::Insert, "def".to_string()),
            ]
        );
    }

    #[test]
    fn test_semantic_reverse_overlap_elimination() {
        let mut diffs = vec![chunk(Tag::Delete, "xxxabc"), chunk(Tag::Insert, "defxxx")];
        cleanup_semantic(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Insert, "def".to_string()),
                (Tag::Equal, "xxx".to_string()),
                (Tag::Delete, "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_lossless_prefers_word_boundaries() {
        let mut diffs = vec![
            chunk(Tag::Equal, "The c"),
            chunk(Tag::Insert, "ow and the c"),
            chunk(Tag::Equal, "at."),
        ];
        cleanup_semantic_lossless(&mut diffs);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Equal, "The ".to_string()),
                (Tag::Insert, "cow and the ".to_string()),
                (Tag::Equal, "cat.".to_string()),
            ]
        );
    }

    #[test]
    fn test_efficiency_no_elimination() {
        let mut diffs = vec![
            chunk(Tag::Delete, "ab"),
            chunk(Tag::Insert, "12"),
            chunk(Tag::Equal, "wxyz"),
            chunk(Tag::Delete, "cd"),
            chunk(Tag::Insert, "34"),
        ];
        let expected = diffs.clone();
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(diffs, expected);
    }

    #[test]
    fn test_efficiency_four_edit_elimination() {
        let mut diffs = vec![
            chunk(Tag::Delete, "ab"),
            chunk(Tag::Insert, "12"),
            chunk(Tag::Equal, "xyz"),
            chunk(Tag::Delete, "cd"),
            chunk(Tag::Insert, "34"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Delete, "abxyzcd".to_string()),
                (Tag::Insert, "12xyz34".to_string()),
            ]
        );
    }

    #[test]
    fn test_efficiency_three_edit_elimination() {
        let mut diffs = vec![
            chunk(Tag::Insert, "12"),
            chunk(Tag::Equal, "x"),
            chunk(Tag::Delete, "cd"),
            chunk(Tag::Insert, "34"),
        ];
        cleanup_efficiency(&mut diffs, 4);
        assert_eq!(
            texts(&diffs),
            vec![
                (Tag::Delete, "xcd".to_string()),
                (Tag::Insert, "12x34".to_string()),
            ]
        );
    }

    #[test]
    fn test_overlap_helper() {
        assert_eq!(common_overlap(&['a', 'b', 'c'], &['c', 'd']), 1);
        assert_eq!(common_overlap(&['a', 'b', 'c'], &['x', 'y']), 0);
        assert_eq!(
            common_overlap(&['1', '2', '3', '4'], &['3', '4', '5', '6']),
            2
        );
    }
}
