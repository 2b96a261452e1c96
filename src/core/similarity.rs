//! Pairwise similarity scoring and most-similar pair selection.
//!
//! Merging near-duplicates first keeps the number of interactive
//! conflict decisions over a whole run low, so each round picks the
//! highest-scoring remaining pair.

use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;
use tracing::trace;

use crate::cli::{AppContext, SimilarityArgs};
use crate::core::diff::line_diff;
use crate::infra::io::read_text;

/// A transient comparison result between two representative paths.
#[derive(Debug, Clone)]
pub struct FileSimilarity {
    pub path_a: PathBuf,
    pub path_b: PathBuf,
    /// 1.0 = identical content
    pub score: f64,
}

/// One representative per content group: the first path added to the
/// group, plus its text.
#[derive(Debug, Clone, Copy)]
pub struct Representative<'a> {
    pub path: &'a Path,
    pub text: &'a str,
}

/// Score how similar two texts are, in `[0, 1]`.
///
/// `unchanged = max(lines(a), lines(b)) - Σ max(delete_count, insert_count)`
/// over all diff blocks, clamped at zero; the score is `unchanged`
/// divided by the longer line count. Two empty texts score 1.0.
///
/// The block sum can exceed the longer line count on pathological
/// inputs; the clamp keeps the heuristic in range and is deliberate.
pub fn calculate_similarity(a: &str, b: &str) -> f64 {
    let longest = a.lines().count().max(b.lines().count());
    if longest == 0 {
        return 1.0;
    }

    let changed: usize = line_diff(a, b)
        .iter()
        .map(|block| block.delete_count.max(block.insert_count))
        .sum();

    let unchanged = longest.saturating_sub(changed);
    unchanged as f64 / longest as f64
}

/// Pick the most similar unordered pair of representatives.
///
/// Ties break to the first pair found in `(i, j)` iteration order with
/// `i < j`, so selection is deterministic given a stable group order.
/// With exactly two representatives the pair is returned without
/// scoring.
///
/// # Panics
///
/// Panics if fewer than two representatives are given; the driver only
/// calls this while more than one group remains.
pub fn most_similar_pair(reps: &[Representative<'_>]) -> (usize, usize) {
    assert!(reps.len() >= 2, "pair selection needs at least two groups");

    if reps.len() == 2 {
        return (0, 1);
    }

    let mut best = (0, 1);
    let mut best_score = f64::NEG_INFINITY;

    for (i, j) in (0..reps.len()).tuple_combinations() {
        let pair = FileSimilarity {
            path_a: reps[i].path.to_path_buf(),
            path_b: reps[j].path.to_path_buf(),
            score: calculate_similarity(reps[i].text, reps[j].text),
        };
        trace!(
            a = %pair.path_a.display(),
            b = %pair.path_b.display(),
            score = pair.score,
            "scored pair"
        );
        if pair.score > best_score {
            best_score = pair.score;
            best = (i, j);
        }
    }

    best
}

/// `mup similarity` - print the score between two files.
pub fn run(args: SimilarityArgs, ctx: &AppContext) -> Result<()> {
    let a = read_text(&args.file_a)?;
    let b = read_text(&args.file_b)?;
    let score = calculate_similarity(&a, &b);

    if ctx.quiet {
        println!("{score:.3}");
    } else {
        println!(
            "{} ~ {}: {score:.3}",
            args.file_a.display(),
            args.file_b.display()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep<'a>(path: &'a Path, text: &'a str) -> Representative<'a> {
        Representative { path, text }
    }

    #[test]
    fn identical_texts_score_one() {
        assert_eq!(calculate_similarity("a\nb\nc\n", "a\nb\nc\n"), 1.0);
        assert_eq!(calculate_similarity("", ""), 1.0);
    }

    #[test]
    fn disjoint_texts_score_zero() {
        assert_eq!(calculate_similarity("a\nb\n", "x\ny\n"), 0.0);
    }

    #[test]
    fn near_duplicates_score_high() {
        let a = "one\ntwo\nthree\nfour\n";
        let b = "one\ntwo\nthree\nFOUR\n";
        let score = calculate_similarity(a, b);
        assert_eq!(score, 0.75);
        assert_eq!(calculate_similarity(b, a), score);
    }

    #[test]
    fn empty_versus_content_scores_zero() {
        assert_eq!(calculate_similarity("", "a\nb\n"), 0.0);
    }

    #[test]
    fn selector_picks_highest_scoring_pair() {
        let p = Path::new("x");
        let reps = [
            rep(p, "alpha\nbeta\ngamma\n"),
            rep(p, "totally\ndifferent\n"),
            rep(p, "alpha\nbeta\nGAMMA\n"),
        ];
        assert_eq!(most_similar_pair(&reps), (0, 2));
    }

    #[test]
    fn selector_ties_break_to_first_pair() {
        let p = Path::new("x");
        // All pairs score 0.0; first (i, j) wins
        let reps = [rep(p, "a\n"), rep(p, "b\n"), rep(p, "c\n")];
        assert_eq!(most_similar_pair(&reps), (0, 1));
    }

    #[test]
    fn two_groups_short_circuit() {
        let p = Path::new("x");
        let reps = [rep(p, "anything\n"), rep(p, "else\n")];
        assert_eq!(most_similar_pair(&reps), (0, 1));
    }
}
