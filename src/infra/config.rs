use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs, Strategy};

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default ignore patterns (in addition to .gitignore)
    pub ignore_patterns: Vec<String>,

    /// Default merge settings
    pub merge: MergeConfig,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Filename glob candidates must match
    pub pattern: String,

    /// Default resolution strategy: prompt, ours, theirs, both, skip
    pub strategy: String,
}

impl MergeConfig {
    /// Parse the configured strategy name.
    pub fn strategy(&self) -> Result<Strategy> {
        Strategy::from_str(&self.strategy, true).map_err(|err| {
            anyhow::anyhow!("invalid strategy {:?} in config: {err}", self.strategy)
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ignore_patterns: vec![
                "target".to_string(),
                "node_modules".to_string(),
                "dist".to_string(),
                "build".to_string(),
                ".git".to_string(),
                "__pycache__".to_string(),
                ".DS_Store".to_string(),
            ],
            merge: MergeConfig::default(),
        }
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            pattern: "*".to_string(),
            strategy: "prompt".to_string(),
        }
    }
}

pub fn load_config() -> Result<Config> {
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["mergeup.toml", ".mergeup.toml"];

    for path in &config_paths {
        if Path::new(path).exists() {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with MERGEUP_ prefix
    builder = builder.add_source(config::Environment::with_prefix("MERGEUP").separator("_"));

    let cfg = builder.build().context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(args: InitArgs, ctx: &AppContext) -> Result<()> {
    let config_path = args.path.join("mergeup.toml");

    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
