//! Merge driver state machine.
//!
//! Scanning -> Grouping -> MergeRound* -> Done | Aborted. Each round
//! consumes the two most similar content groups and replaces them with
//! one merged group, so N initial groups converge in exactly N-1
//! rounds. Completed rounds are never rolled back; cancellation is
//! cooperative and takes effect at round boundaries and before the
//! writes of the round in progress.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::{debug, info, warn};

use crate::cli::{AppContext, MergeArgs, Strategy};
use crate::core::hash::{FileGroup, fingerprint, group_files};
use crate::core::resolve::{DecisionSource, FixedPolicy, MergeError, Resolution, merge_texts};
use crate::core::similarity::{Representative, calculate_similarity, most_similar_pair};
use crate::infra::config::load_config;
use crate::infra::io::{read_text, write_text};
use crate::infra::walk::FileScanner;
use crate::ui::prompt::PromptSource;
use crate::ui::render::render_line_diff;

/// Cooperative cancellation flag shared with the caller.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Terminal state of one merge invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    /// All matched files now share one version
    Converged,
    /// Fewer than 2 files, or all copies already identical
    NothingToMerge,
    /// Cancelled; completed rounds' writes are kept
    Aborted,
}

/// Summary of a merge invocation.
#[derive(Debug)]
pub struct MergeReport {
    pub status: MergeStatus,
    /// Completed merge rounds
    pub rounds: usize,
    /// Distinct content groups before the first round
    pub initial_groups: usize,
    /// Files matched by the scan
    pub files: usize,
    /// Files excluded because they could not be read
    pub skipped: usize,
}

/// A live group plus its representative text. The driver exclusively
/// owns this list for the duration of one invocation.
struct Working {
    group: FileGroup,
    text: String,
}

/// The merge engine proper, decoupled from CLI wiring so tests can
/// inject a policy decision source and a pre-cancelled token.
pub struct MergeEngine<'a> {
    pub cancel: &'a CancelToken,
    /// false under --dry-run: full control flow, no disk writes
    pub write: bool,
    pub quiet: bool,
    pub color: bool,
}

impl MergeEngine<'_> {
    /// Run grouping and merge rounds over `files` until one group
    /// remains or the run is cancelled.
    pub fn merge(&self, files: &[PathBuf], source: &mut dyn DecisionSource) -> Result<MergeReport> {
        if files.len() < 2 {
            if !self.quiet {
                println!("found {} matching file(s); nothing to merge", files.len());
            }
            return Ok(MergeReport {
                status: MergeStatus::NothingToMerge,
                rounds: 0,
                initial_groups: files.len(),
                files: files.len(),
                skipped: 0,
            });
        }

        let progress = if self.quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(files.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} hashing [{bar:30.cyan/blue}] {pos}/{len}")
                    .unwrap()
                    .progress_chars("#>-"),
            );
            pb
        };
        let (groups, skipped) = group_files(files, |_| progress.inc(1));
        progress.finish_and_clear();

        let report = |status: MergeStatus, rounds: usize, initial_groups: usize| MergeReport {
            status,
            rounds,
            initial_groups,
            files: files.len(),
            skipped,
        };

        if groups.len() <= 1 {
            if !self.quiet {
                println!(
                    "all {} readable file(s) already share identical content",
                    groups.first().map_or(0, |g| g.paths.len())
                );
            }
            return Ok(report(MergeStatus::NothingToMerge, 0, groups.len()));
        }

        // Load one representative text per group: the first path added.
        let mut working = Vec::with_capacity(groups.len());
        for group in groups {
            if self.cancel.is_cancelled() {
                return Ok(report(MergeStatus::Aborted, 0, 0));
            }
            let text = read_text(&group.paths[0])?;
            working.push(Working { group, text });
        }

        let initial_groups = working.len();
        let total_rounds = initial_groups - 1;
        let mut rounds = 0usize;

        while working.len() > 1 {
            if self.cancel.is_cancelled() {
                return Ok(report(MergeStatus::Aborted, rounds, initial_groups));
            }

            let (i, j) = {
                let reps: Vec<Representative<'_>> = working
                    .iter()
                    .map(|w| Representative {
                        path: w.group.paths[0].as_path(),
                        text: &w.text,
                    })
                    .collect();
                most_similar_pair(&reps)
            };

            let round = rounds + 1;
            if !self.quiet {
                let score = calculate_similarity(&working[i].text, &working[j].text);
                let current = working[i].group.paths[0].display().to_string();
                let incoming = working[j].group.paths[0].display().to_string();
                if self.color {
                    println!(
                        "{} {round}/{total_rounds}: merging {} into {} (similarity {score:.3})",
                        "round".bold(),
                        incoming.yellow(),
                        current.yellow()
                    );
                } else {
                    println!(
                        "round {round}/{total_rounds}: merging {incoming} into {current} (similarity {score:.3})"
                    );
                }
                // Informational only; decisions go through the source
                print!("{}", render_line_diff(&working[i].text, &working[j].text, self.color));
            }

            let merged = match merge_texts(&working[i].text, &working[j].text, source) {
                Ok(merged) => merged,
                Err(err)
                    if err.downcast_ref::<MergeError>() == Some(&MergeError::Cancelled) =>
                {
                    return Ok(report(MergeStatus::Aborted, rounds, initial_groups));
                }
                Err(err) => return Err(err),
            };

            // Cancellation raised while the source was blocked takes
            // effect here, before any write of this round. The union
            // writes below are never interrupted mid-way.
            if self.cancel.is_cancelled() {
                return Ok(report(MergeStatus::Aborted, rounds, initial_groups));
            }

            let second = working.remove(j); // j > i, remove higher index first
            let first = working.remove(i);
            let mut paths = first.group.paths;
            paths.extend(second.group.paths);

            if self.write {
                for path in &paths {
                    write_text(path, &merged.text)?;
                }
            }

            debug!(
                round,
                blocks = merged.decided_blocks,
                members = paths.len(),
                "merge round complete"
            );

            working.push(Working {
                group: FileGroup {
                    hash: fingerprint(&merged.text),
                    paths,
                },
                text: merged.text,
            });
            rounds += 1;
        }

        if !self.quiet {
            println!(
                "converged: {} file(s) now share one version after {rounds} round(s)",
                working[0].group.paths.len()
            );
        }
        Ok(report(MergeStatus::Converged, rounds, initial_groups))
    }
}

/// `mup merge` - scan, group, and merge under a root directory.
pub fn run(args: MergeArgs, ctx: &AppContext) -> Result<()> {
    if !args.root.is_dir() {
        anyhow::bail!("root directory not found: {}", args.root.display());
    }

    let config = load_config().unwrap_or_else(|err| {
        warn!("falling back to default config: {err:#}");
        crate::infra::config::Config::default()
    });
    let strategy = match args.strategy {
        Some(strategy) => strategy,
        None => config.merge.strategy()?,
    };
    let pattern = args.pattern.unwrap_or(config.merge.pattern);

    let mut ignores = config.ignore_patterns;
    ignores.extend(args.ignore);

    let scanner = FileScanner::new(&pattern, &ignores)?;
    let files = scanner.scan(&args.root);

    if let Some(batch) = &args.batch {
        info!(batch = %batch, pattern = %pattern, "starting merge batch");
    }

    let cancel = CancelToken::new();
    let mut source: Box<dyn DecisionSource> = match strategy {
        Strategy::Prompt => Box::new(PromptSource::new(!ctx.no_color)),
        Strategy::Ours => Box::new(FixedPolicy(Resolution::UseLeft)),
        Strategy::Theirs => Box::new(FixedPolicy(Resolution::UseRight)),
        Strategy::Both => Box::new(FixedPolicy(Resolution::UseBoth)),
        Strategy::Skip => Box::new(FixedPolicy(Resolution::Skip)),
    };

    let engine = MergeEngine {
        cancel: &cancel,
        write: !ctx.dry_run,
        quiet: ctx.quiet,
        color: !ctx.no_color,
    };
    let report = engine
        .merge(&files, source.as_mut())
        .with_context(|| format!("merging under {}", args.root.display()))?;

    if report.status == MergeStatus::Aborted && !ctx.quiet {
        println!(
            "aborted after {} completed round(s); files written so far are kept",
            report.rounds
        );
    }
    if ctx.dry_run && !ctx.quiet && report.rounds > 0 {
        println!("dry run: no files were written");
    }
    Ok(())
}
