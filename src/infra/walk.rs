//! Gitignore-aware file scanning with filename glob matching.
//!
//! - Respects .gitignore, .git/info/exclude, and global gitignore
//! - Matches candidate files by filename glob (e.g. "*.md")
//! - Extra ignore globs prune directories early and filter files late
//! - Deterministic (sorted) ordering for stable runs and tests
//!
//! Backed by ripgrep's `ignore` crate and `globset`.

use std::path::{Path, PathBuf};

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::{DirEntry, WalkBuilder};

/// Finds candidate files for merging under a root directory.
pub struct FileScanner {
    /// Filename glob the candidates must match
    pattern: GlobSet,

    /// Extra ignore patterns, matched against root-relative paths
    ignore_patterns: GlobSet,
}

impl FileScanner {
    /// Build a scanner for one filename glob plus extra ignore globs
    /// (e.g. "target", "node_modules", "**/*.min.js").
    pub fn new(pattern: &str, additional_ignores: &[String]) -> Result<Self> {
        let mut candidates = GlobSetBuilder::new();
        candidates.add(Glob::new(pattern)?);

        let mut ignores = GlobSetBuilder::new();
        for glob in additional_ignores {
            ignores.add(Glob::new(glob)?);
        }

        Ok(Self {
            pattern: candidates.build()?,
            ignore_patterns: ignores.build()?,
        })
    }

    /// Traverse `root` and return every matching file, sorted.
    pub fn scan<P: AsRef<Path>>(&self, root: P) -> Vec<PathBuf> {
        let root = root.as_ref().to_path_buf();

        let mut builder = WalkBuilder::new(&root);
        // Dotfiles are eligible candidates; ignore rules still apply
        builder.hidden(false);
        builder.git_ignore(true);
        builder.git_global(true);
        builder.git_exclude(true);

        // Early directory pruning against root-relative paths
        let ignores = self.ignore_patterns.clone();
        let prune_root = root.clone();
        builder.filter_entry(move |entry: &DirEntry| {
            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            if !is_dir {
                return true;
            }
            let rel = entry.path().strip_prefix(&prune_root).unwrap_or(entry.path());
            !ignores.is_match(rel)
        });

        let mut out: Vec<PathBuf> = builder
            .build()
            // Drop entries with IO errors
            .filter_map(|res| res.ok())
            // Keep only regular files
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            // Late filtering: extra ignores on relative path, then the
            // filename glob
            .filter(|abs| {
                let rel = abs.strip_prefix(&root).unwrap_or(abs);
                if self.ignore_patterns.is_match(rel) {
                    return false;
                }
                abs.file_name()
                    .is_some_and(|name| self.pattern.is_match(Path::new(name)))
            })
            .collect();

        // Deterministic order (stable CLI & tests)
        out.sort();

        out
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    /// Create a file with parent dirs as needed
    fn write_file(root: &Path, rel: &str, contents: &str) -> Result<()> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    #[test]
    fn matches_filename_glob_recursively() -> Result<()> {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        write_file(root, "notes.md", "# a")?;
        write_file(root, "docs/notes.md", "# b")?;
        write_file(root, "docs/other.txt", "t")?;

        let scanner = FileScanner::new("*.md", &[])?;
        let files = scanner.scan(root);

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.extension().unwrap() == "md"));
        assert!(files.windows(2).all(|w| w[0] <= w[1]));
        Ok(())
    }

    #[test]
    fn respects_gitignore() -> Result<()> {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        // init git repo so .gitignore applies; skip when git is absent
        let git_ok = std::process::Command::new("git")
            .args(["init"])
            .current_dir(root)
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false);
        if !git_ok {
            return Ok(());
        }

        write_file(root, ".gitignore", "generated.txt")?;
        write_file(root, "generated.txt", "ignored")?;
        write_file(root, "keep.txt", "keep")?;

        let scanner = FileScanner::new("*.txt", &[".git".to_string()])?;
        let files = scanner.scan(root);

        assert_eq!(files.len(), 1, "unexpected files: {files:?}");
        assert_eq!(files[0].file_name().unwrap(), "keep.txt");
        Ok(())
    }

    #[test]
    fn extra_globs_prune_and_filter() -> Result<()> {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        write_file(root, "target/build/out.txt", "bin")?;
        write_file(root, "node_modules/pkg/index.txt", "js")?;
        write_file(root, "src/readme.txt", "doc")?;

        let ignores = vec!["target".to_string(), "node_modules".to_string()];
        let scanner = FileScanner::new("*.txt", &ignores)?;
        let files = scanner.scan(root);

        assert_eq!(files.len(), 1, "unexpected files: {files:?}");
        assert_eq!(
            files[0].strip_prefix(root).unwrap(),
            Path::new("src/readme.txt")
        );
        Ok(())
    }

    #[test]
    fn file_level_ignore_glob_filters_matches() -> Result<()> {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        write_file(root, "a.min.js", "min")?;
        write_file(root, "a.js", "src")?;

        let scanner = FileScanner::new("*.js", &["**/*.min.js".to_string()])?;
        let files = scanner.scan(root);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].file_name().unwrap(), "a.js");
        Ok(())
    }

    #[test]
    fn hidden_files_are_candidates() -> Result<()> {
        let tmp = TempDir::new()?;
        let root = tmp.path();

        write_file(root, ".env.example", "A=1")?;
        write_file(root, "sub/.env.example", "A=2")?;

        let scanner = FileScanner::new(".env.example", &[])?;
        let files = scanner.scan(root);

        assert_eq!(files.len(), 2);
        Ok(())
    }
}
