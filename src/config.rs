//! Configuration management for the notebook rewriter.
//!
//! Handles:
//! - Command-line argument parsing
//! - Optional TOML config (user-global, then project), overridden by flags

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::discovery::{NamePattern, DEFAULT_PATTERN};
use crate::notebook::DEFAULT_INDENT;
use crate::runner::ProcessOptions;

/// Name of the project config file looked up in the notebook directory
pub const PROJECT_CONFIG_FILE: &str = ".colab-setup.toml";

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "colab-setup")]
#[command(about = "Make Rust notebooks runnable on a hosted Python notebook service")]
#[command(version)]
pub struct Args {
    /// Directory containing the notebooks
    #[arg(long, help = "Directory containing the notebooks (default: current directory)")]
    pub dir: Option<PathBuf>,

    /// File name pattern
    #[arg(long, help = "Glob-style file name pattern (default: chapter_*.ipynb)")]
    pub pattern: Option<String>,

    /// JSON indentation width
    #[arg(long, help = "Spaces per indentation level when writing notebooks")]
    pub indent: Option<usize>,

    /// Also wrap raw Rust code cells in compile-and-run bash cells
    #[arg(long, overrides_with = "no_convert_code")]
    pub convert_code: bool,

    /// Leave code cells alone even if a config file enables conversion
    #[arg(long, overrides_with = "convert_code")]
    pub no_convert_code: bool,

    /// Log level
    #[arg(
        long,
        default_value = "info",
        help = "Log level (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
}

impl Args {
    /// Explicit `--convert-code` / `--no-convert-code`, if either was given
    fn convert_code_flag(&self) -> Option<bool> {
        match (self.convert_code, self.no_convert_code) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Settings read from a TOML config file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub pattern: Option<String>,
    pub indent: Option<usize>,
    pub convert_code_cells: Option<bool>,
}

impl FileConfig {
    /// Load a config file; `Ok(None)` when it does not exist
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        Ok(Some(config))
    }

    fn merge(&mut self, other: FileConfig) {
        if other.pattern.is_some() {
            self.pattern = other.pattern;
        }
        if other.indent.is_some() {
            self.indent = other.indent;
        }
        if other.convert_code_cells.is_some() {
            self.convert_code_cells = other.convert_code_cells;
        }
    }
}

/// Combined configuration from all sources
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory scanned for notebooks
    pub dir: PathBuf,
    /// File name pattern
    pub pattern: NamePattern,
    /// Indentation width for written notebooks
    pub indent: usize,
    /// Wrap raw code cells as well as injecting the setup cell
    pub convert_code_cells: bool,
    /// Log level
    pub log_level: String,
    /// Config files that were found and applied, in order
    pub sources: Vec<PathBuf>,
}

impl Config {
    /// Create configuration from command-line arguments
    pub fn from_args_and_env() -> Result<Self> {
        Self::from_args(Args::parse())
    }

    /// Create configuration from explicit arguments, reading the user-global
    /// config file if there is one
    pub fn from_args(args: Args) -> Result<Self> {
        Self::resolve(args, user_config_path().as_deref())
    }

    /// Merge `global_config`, the project config and `args`, later winning
    pub fn resolve(args: Args, global_config: Option<&Path>) -> Result<Self> {
        let convert_code_flag = args.convert_code_flag();
        let dir = args.dir.unwrap_or_else(|| PathBuf::from("."));

        let mut merged = FileConfig::default();
        let mut sources = Vec::new();

        let project_config = dir.join(PROJECT_CONFIG_FILE);
        for path in global_config.into_iter().chain([project_config.as_path()]) {
            if let Some(file) = FileConfig::load(path)? {
                merged.merge(file);
                sources.push(path.to_path_buf());
            }
        }

        let pattern = args
            .pattern
            .or(merged.pattern)
            .unwrap_or_else(|| DEFAULT_PATTERN.to_string());

        Ok(Config {
            pattern: NamePattern::new(&pattern)?,
            indent: args.indent.or(merged.indent).unwrap_or(DEFAULT_INDENT),
            convert_code_cells: convert_code_flag
                .or(merged.convert_code_cells)
                .unwrap_or(false),
            log_level: args.log_level,
            dir,
            sources,
        })
    }

    /// Per-file processing options
    pub fn process_options(&self) -> ProcessOptions {
        ProcessOptions {
            indent: self.indent,
            convert_code_cells: self.convert_code_cells,
        }
    }
}

/// `<config dir>/colab-notebook-setup/config.toml`
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("colab-notebook-setup").join("config.toml"))
}
