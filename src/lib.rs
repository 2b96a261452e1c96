//! **mergeup** - Interactive CLI for converging divergent file copies
//!
//! Finds every copy of a file scattered under a directory tree, groups the
//! copies by content fingerprint, and iteratively merges the two most
//! similar groups until a single canonical version remains.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Core merge engine - hashing, scoring, conflict resolution, driver
pub mod core {
    /// Narrow line-diff interface over the `similar` crate
    pub mod diff;
    pub use diff::{DiffBlock, line_diff};

    /// Content fingerprinting and hash-based file grouping
    pub mod hash;
    pub use hash::{FileGroup, fingerprint, group_files};

    /// Pairwise similarity scoring and most-similar pair selection
    pub mod similarity;
    pub use similarity::{calculate_similarity, most_similar_pair, run as similarity_run};

    /// Per-block conflict resolution against an injected decision source
    pub mod resolve;
    pub use resolve::{DecisionSource, FixedPolicy, MergeError, Resolution, merge_texts};

    /// Merge driver state machine orchestrating repeated pairwise merges
    pub mod driver;
    pub use driver::{CancelToken, MergeEngine, MergeReport, MergeStatus, run as merge_run};
}

/// Infrastructure - configuration, I/O, and file scanning
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Text file read/write helpers with contextual errors
    pub mod io;
    pub use io::{read_text, write_text};

    /// Gitignore-aware file scanning with filename glob matching
    pub mod walk;
    pub use walk::FileScanner;
}

/// Terminal UI - interactive prompts and diff rendering
pub mod ui {
    /// Interactive decision source backed by a terminal select prompt
    pub mod prompt;
    pub use prompt::PromptSource;

    /// Informational colored line-diff rendering
    pub mod render;
    pub use render::render_line_diff;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Config, FileScanner, load_config};
pub use self::core::{merge_run, similarity_run};

// Core types for external consumers
pub use self::core::{
    CancelToken, DecisionSource, DiffBlock, FileGroup, FixedPolicy, MergeEngine, MergeReport,
    MergeStatus, Resolution,
};
