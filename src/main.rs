use anyhow::Result;
use clap::Parser;
use mergeup::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Log to stderr so merge output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("MUP_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    match cli.command {
        Commands::Merge(args) => mergeup::merge_run(args, &ctx),
        Commands::Similarity(args) => mergeup::similarity_run(args, &ctx),
        Commands::Init(args) => mergeup::infra::config::init(args, &ctx),
        Commands::Completions(args) => mergeup::completion::run(args),
    }
}
