//! Informational colored line-diff rendering.
//!
//! Shown at each round boundary so the caller can see what the round is
//! about to reconcile; decisions themselves go through the decision
//! source, never through this output.

use owo_colors::OwoColorize;
use similar::{ChangeTag, TextDiff};

/// Render a line diff between `current` and `incoming` with `-`/`+`
/// gutters, optionally colored.
pub fn render_line_diff(current: &str, incoming: &str, color: bool) -> String {
    let diff = TextDiff::from_lines(current, incoming);
    let mut out = String::new();

    for change in diff.iter_all_changes() {
        let line = change.value().trim_end_matches('\n');
        match change.tag() {
            ChangeTag::Delete => {
                if color {
                    out.push_str(&format!("{}\n", format!("-{line}").red()));
                } else {
                    out.push_str(&format!("-{line}\n"));
                }
            }
            ChangeTag::Insert => {
                if color {
                    out.push_str(&format!("{}\n", format!("+{line}").green()));
                } else {
                    out.push_str(&format!("+{line}\n"));
                }
            }
            ChangeTag::Equal => {
                out.push_str(&format!(" {line}\n"));
            }
        }
    }

    out
}
