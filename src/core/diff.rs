//! Line-level diffing behind a narrow interface.
//!
//! The similarity scorer and the conflict resolver both consume
//! [`DiffBlock`]s; the underlying algorithm (Myers via the `similar`
//! crate) can be swapped without touching either.

use similar::{Algorithm, DiffOp, TextDiff};

/// A contiguous region where two line sequences disagree.
///
/// `delete_*` ranges index into text A, `insert_*` ranges into text B.
/// Blocks are produced in non-overlapping, increasing order over both
/// texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffBlock {
    pub delete_start: usize,
    pub delete_count: usize,
    pub insert_start: usize,
    pub insert_count: usize,
}

/// Compute the line-level diff between two texts as a list of blocks.
///
/// Identical texts (including two empty texts) yield an empty list.
pub fn line_diff(a: &str, b: &str) -> Vec<DiffBlock> {
    let diff = TextDiff::configure()
        .algorithm(Algorithm::Myers)
        .diff_lines(a, b);

    diff.ops()
        .iter()
        .filter_map(|op| match *op {
            DiffOp::Equal { .. } => None,
            DiffOp::Delete {
                old_index,
                old_len,
                new_index,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: old_len,
                insert_start: new_index,
                insert_count: 0,
            }),
            DiffOp::Insert {
                old_index,
                new_index,
                new_len,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: 0,
                insert_start: new_index,
                insert_count: new_len,
            }),
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => Some(DiffBlock {
                delete_start: old_index,
                delete_count: old_len,
                insert_start: new_index,
                insert_count: new_len,
            }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_texts_have_no_blocks() {
        assert!(line_diff("a\nb\nc\n", "a\nb\nc\n").is_empty());
        assert!(line_diff("", "").is_empty());
    }

    #[test]
    fn single_line_replacement_is_one_block() {
        let blocks = line_diff("a\nb\nc\n", "a\nx\nc\n");
        assert_eq!(
            blocks,
            vec![DiffBlock {
                delete_start: 1,
                delete_count: 1,
                insert_start: 1,
                insert_count: 1,
            }]
        );
    }

    #[test]
    fn pure_insertion_has_zero_delete_count() {
        let blocks = line_diff("a\nc\n", "a\nb\nc\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].delete_count, 0);
        assert_eq!(blocks[0].insert_count, 1);
        assert_eq!(blocks[0].insert_start, 1);
    }

    #[test]
    fn pure_deletion_has_zero_insert_count() {
        let blocks = line_diff("a\nb\nc\n", "a\nc\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].delete_count, 1);
        assert_eq!(blocks[0].insert_count, 0);
    }

    #[test]
    fn blocks_are_increasing_and_non_overlapping() {
        let a = "one\ntwo\nthree\nfour\nfive\n";
        let b = "one\nTWO\nthree\nfour\nFIVE\nsix\n";
        let blocks = line_diff(a, b);
        assert!(blocks.len() >= 2);
        for pair in blocks.windows(2) {
            assert!(pair[0].delete_start + pair[0].delete_count <= pair[1].delete_start);
            assert!(pair[0].insert_start + pair[0].insert_count <= pair[1].insert_start);
        }
    }
}
