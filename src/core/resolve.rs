//! Per-block conflict resolution.
//!
//! Walks the line-level diff between a "current" and an "incoming" text,
//! emits runs of unchanged lines verbatim, and asks an injected decision
//! source what to do with each conflicting block. The merge algorithm is
//! pure; production wires an interactive prompt as the source, tests wire
//! a fixed policy.

use anyhow::Result;
use thiserror::Error;

use crate::core::diff::line_diff;

/// The four per-block decisions a decision source can return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Keep the current side's lines
    UseLeft,
    /// Take the incoming side's lines
    UseRight,
    /// Keep both, current lines first
    UseBoth,
    /// Drop both sides
    Skip,
}

/// Typed core error; cooperative cancellation surfaces as a clean abort
/// rather than an exception-driven crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("merge cancelled")]
    Cancelled,
}

/// The sole interactive boundary of the engine: one decision per
/// conflicting block, given both line sets and the block's ordinal.
pub trait DecisionSource {
    fn decide(
        &mut self,
        deleted: &[&str],
        inserted: &[&str],
        block_index: usize,
    ) -> Result<Resolution>;
}

/// Non-interactive source that answers every block the same way.
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub Resolution);

impl DecisionSource for FixedPolicy {
    fn decide(&mut self, _deleted: &[&str], _inserted: &[&str], _index: usize) -> Result<Resolution> {
        Ok(self.0)
    }
}

/// Result of merging two texts.
#[derive(Debug)]
pub struct Merged {
    /// Lines joined with `\n`
    pub text: String,
    /// How many blocks required a decision
    pub decided_blocks: usize,
}

/// Merge `incoming` into `current`, asking `source` about each block.
///
/// With zero diff blocks the texts are identical and `current` is
/// returned unchanged; a block with no deleted and no inserted lines is
/// a silent no-op. Neither normally occurs (identical content would
/// already share a group) but both are handled defensively.
pub fn merge_texts(
    current: &str,
    incoming: &str,
    source: &mut dyn DecisionSource,
) -> Result<Merged> {
    let blocks = line_diff(current, incoming);
    if blocks.is_empty() {
        return Ok(Merged {
            text: current.to_string(),
            decided_blocks: 0,
        });
    }

    let left: Vec<&str> = current.lines().collect();
    let right: Vec<&str> = incoming.lines().collect();

    let mut out: Vec<&str> = Vec::with_capacity(left.len().max(right.len()));
    let mut cursor = 0usize; // next unconsumed line of `current`
    let mut decided = 0usize;

    for (index, block) in blocks.iter().enumerate() {
        // Unchanged run before this block, verbatim
        out.extend(&left[cursor..block.delete_start]);
        cursor = block.delete_start + block.delete_count;

        let deleted = &left[block.delete_start..cursor];
        let inserted = &right[block.insert_start..block.insert_start + block.insert_count];
        if deleted.is_empty() && inserted.is_empty() {
            continue;
        }

        decided += 1;
        match source.decide(deleted, inserted, index)? {
            Resolution::UseLeft => out.extend(deleted),
            Resolution::UseRight => out.extend(inserted),
            Resolution::UseBoth => {
                out.extend(deleted);
                out.extend(inserted);
            }
            Resolution::Skip => {}
        }
    }

    // Trailing unchanged lines after the last block
    out.extend(&left[cursor..]);

    Ok(Merged {
        text: out.join("\n"),
        decided_blocks: decided,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merge_with(current: &str, incoming: &str, policy: Resolution) -> Merged {
        merge_texts(current, incoming, &mut FixedPolicy(policy)).unwrap()
    }

    #[test]
    fn replacement_block_use_right() {
        let merged = merge_with("a\nb\nc\n", "a\nx\nc\n", Resolution::UseRight);
        assert_eq!(merged.text, "a\nx\nc");
        assert_eq!(merged.decided_blocks, 1);
    }

    #[test]
    fn replacement_block_use_left() {
        let merged = merge_with("a\nb\nc\n", "a\nx\nc\n", Resolution::UseLeft);
        assert_eq!(merged.text, "a\nb\nc");
    }

    #[test]
    fn replacement_block_use_both() {
        let merged = merge_with("a\nb\nc\n", "a\nx\nc\n", Resolution::UseBoth);
        assert_eq!(merged.text, "a\nb\nx\nc");
    }

    #[test]
    fn replacement_block_skip() {
        let merged = merge_with("a\nb\nc\n", "a\nx\nc\n", Resolution::Skip);
        assert_eq!(merged.text, "a\nc");
    }

    #[test]
    fn identical_texts_need_no_decision() {
        struct Unreachable;
        impl DecisionSource for Unreachable {
            fn decide(&mut self, _: &[&str], _: &[&str], _: usize) -> Result<Resolution> {
                panic!("resolver must not be consulted for identical texts");
            }
        }

        let merged = merge_texts("a\nb\n", "a\nb\n", &mut Unreachable).unwrap();
        assert_eq!(merged.text, "a\nb\n");
        assert_eq!(merged.decided_blocks, 0);
    }

    #[test]
    fn insertion_only_block_passes_empty_deleted_side() {
        struct Capture(Vec<(usize, usize)>);
        impl DecisionSource for Capture {
            fn decide(
                &mut self,
                deleted: &[&str],
                inserted: &[&str],
                _: usize,
            ) -> Result<Resolution> {
                self.0.push((deleted.len(), inserted.len()));
                Ok(Resolution::UseRight)
            }
        }

        let mut source = Capture(Vec::new());
        let merged = merge_texts("a\nc\n", "a\nb\nc\n", &mut source).unwrap();
        assert_eq!(merged.text, "a\nb\nc");
        assert_eq!(source.0, vec![(0, 1)]);
    }

    #[test]
    fn multiple_blocks_are_indexed_in_order() {
        struct Indexes(Vec<usize>);
        impl DecisionSource for Indexes {
            fn decide(&mut self, _: &[&str], _: &[&str], index: usize) -> Result<Resolution> {
                self.0.push(index);
                Ok(Resolution::UseLeft)
            }
        }

        let mut source = Indexes(Vec::new());
        let merged = merge_texts(
            "keep\nold1\nkeep\nold2\nkeep\n",
            "keep\nnew1\nkeep\nnew2\nkeep\n",
            &mut source,
        )
        .unwrap();
        assert_eq!(merged.text, "keep\nold1\nkeep\nold2\nkeep");
        assert_eq!(source.0, vec![0, 1]);
    }

    #[test]
    fn source_error_propagates() {
        struct Cancelling;
        impl DecisionSource for Cancelling {
            fn decide(&mut self, _: &[&str], _: &[&str], _: usize) -> Result<Resolution> {
                Err(MergeError::Cancelled.into())
            }
        }

        let err = merge_texts("a\n", "b\n", &mut Cancelling).unwrap_err();
        assert_eq!(err.downcast_ref::<MergeError>(), Some(&MergeError::Cancelled));
    }
}
