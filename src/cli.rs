use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "mergeup", bin_name = "mup")]
#[command(
    about = "A fast, interactive CLI for converging divergent file copies via iterative N-way merging"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress progress bars and non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Simulate the merge without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge all divergent copies of matching files into one version
    Merge(MergeArgs),

    /// Print the similarity score between two files
    Similarity(SimilarityArgs),

    /// Initialize a mergeup.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Parser)]
pub struct MergeArgs {
    /// Root directory to scan for candidate files
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Filename glob to match (e.g. "*.md", "config.yaml"); defaults to
    /// the configured pattern, else "*"
    #[arg(short, long)]
    pub pattern: Option<String>,

    /// Additional glob patterns to ignore (on top of .gitignore)
    #[arg(short, long)]
    pub ignore: Vec<String>,

    /// How to resolve each conflicting block; defaults to the configured
    /// strategy, else prompt
    #[arg(long, value_enum)]
    pub strategy: Option<Strategy>,

    /// Optional label for this run (logged, not used by the engine)
    #[arg(long)]
    pub batch: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Ask interactively for every conflicting block
    Prompt,
    /// Always keep the current side
    Ours,
    /// Always take the incoming side
    Theirs,
    /// Keep both sides, current first
    Both,
    /// Drop both sides
    Skip,
}

#[derive(Parser)]
pub struct SimilarityArgs {
    /// First file to compare
    pub file_a: PathBuf,

    /// Second file to compare
    pub file_b: PathBuf,
}

#[derive(Parser)]
pub struct InitArgs {
    /// Directory to initialize config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Output directory; if omitted and --stdout not set, prints error
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Print completion script to stdout instead of a file
    #[arg(long)]
    pub stdout: bool,
}
