//! Interactive decision source backed by a terminal select prompt.
//!
//! This is the production wiring of the engine's sole interactive
//! boundary; tests substitute [`crate::core::resolve::FixedPolicy`].
//! Dismissing the prompt (Esc/q) maps to cooperative cancellation.

use anyhow::{Context, Result};
use dialoguer::Select;
use dialoguer::theme::{ColorfulTheme, SimpleTheme};
use owo_colors::OwoColorize;

use crate::core::resolve::{DecisionSource, MergeError, Resolution};

const CHOICES: [&str; 4] = [
    "keep current",
    "take incoming",
    "keep both (current first)",
    "drop both",
];

pub struct PromptSource {
    color: bool,
}

impl PromptSource {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn show_block(&self, deleted: &[&str], inserted: &[&str], block_index: usize) {
        println!();
        if self.color {
            println!("{} #{}", "conflict".bold(), block_index + 1);
            for line in deleted {
                println!("{}", format!("- {line}").red());
            }
            for line in inserted {
                println!("{}", format!("+ {line}").green());
            }
        } else {
            println!("conflict #{}", block_index + 1);
            for line in deleted {
                println!("- {line}");
            }
            for line in inserted {
                println!("+ {line}");
            }
        }
    }
}

impl DecisionSource for PromptSource {
    fn decide(
        &mut self,
        deleted: &[&str],
        inserted: &[&str],
        block_index: usize,
    ) -> Result<Resolution> {
        self.show_block(deleted, inserted, block_index);

        let prompt = format!("resolve conflict #{}", block_index + 1);
        let selection = if self.color {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt.as_str())
                .items(&CHOICES)
                .default(0)
                .interact_opt()
        } else {
            Select::with_theme(&SimpleTheme)
                .with_prompt(prompt.as_str())
                .items(&CHOICES)
                .default(0)
                .interact_opt()
        }
        .context("reading conflict resolution")?;

        match selection {
            Some(0) => Ok(Resolution::UseLeft),
            Some(1) => Ok(Resolution::UseRight),
            Some(2) => Ok(Resolution::UseBoth),
            Some(_) => Ok(Resolution::Skip),
            // Prompt dismissed: treat as cancellation
            None => Err(MergeError::Cancelled.into()),
        }
    }
}
