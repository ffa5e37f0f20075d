//! Per-file processing loop.
//!
//! Each notebook is loaded, transformed and written back on its own; a failure
//! is logged and recorded in the [`RunSummary`] without stopping the run.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;
use crate::discovery::discover;
use crate::notebook::{self, DEFAULT_INDENT};
use crate::transform;

/// Options applied to every processed notebook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOptions {
    pub indent: usize,
    pub convert_code_cells: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
            convert_code_cells: false,
        }
    }
}

/// What happened to a single notebook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Setup cell already present; file left untouched
    Skipped,
    /// Notebook rewritten
    Updated { converted_cells: usize },
}

/// A notebook that could not be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Totals for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Notebooks attempted
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub failures: Vec<FileFailure>,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Load, transform and rewrite one notebook
pub fn process(path: &Path, options: &ProcessOptions) -> Result<Outcome> {
    log::info!("Processing {}...", path.display());

    let mut nb = notebook::load(path)?;

    if transform::already_processed(&nb) {
        log::info!("  [OK] Already has setup cell, skipping");
        return Ok(Outcome::Skipped);
    }

    transform::annotate_intro(&mut nb);
    let position = transform::insert_setup(&mut nb);
    log::debug!("  setup cell inserted at index {}", position);

    let converted_cells = if options.convert_code_cells {
        let converted = transform::convert_code_cells(&mut nb);
        log::debug!("  wrapped {} code cells", converted);
        converted
    } else {
        0
    };

    transform::rewrite_metadata(&mut nb);
    notebook::store(path, &nb, options.indent)?;

    log::info!("  [OK] Updated successfully");
    Ok(Outcome::Updated { converted_cells })
}

/// Process every path in order, isolating failures per file
pub fn process_all(paths: &[PathBuf], options: &ProcessOptions) -> RunSummary {
    let mut summary = RunSummary {
        total: paths.len(),
        ..Default::default()
    };

    for path in paths {
        match process(path, options) {
            Ok(Outcome::Skipped) => summary.skipped += 1,
            Ok(Outcome::Updated { .. }) => summary.updated += 1,
            Err(e) => {
                log::error!("  [ERROR] {}: {:#}", path.display(), e);
                summary.failures.push(FileFailure {
                    path: path.clone(),
                    message: format!("{:#}", e),
                });
            }
        }
    }

    summary
}

/// Discover and process all notebooks named by `config`
pub fn run(config: &Config) -> Result<RunSummary> {
    let paths = discover(&config.dir, &config.pattern)?;
    log::info!("Found {} notebooks to process", paths.len());

    let summary = process_all(&paths, &config.process_options());

    log::info!("");
    log::info!("[DONE] Processed {} notebooks", summary.total);
    log::info!(
        "  updated: {}, skipped: {}, failed: {}",
        summary.updated,
        summary.skipped,
        summary.failed()
    );
    if summary.failed() > 0 {
        log::warn!(
            "  {} notebook(s) could not be processed and were left unchanged",
            summary.failed()
        );
    }

    Ok(summary)
}
