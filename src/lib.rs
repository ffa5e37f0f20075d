//! Colab Notebook Setup
//!
//! Rewrites Rust-teaching Jupyter notebooks so they run on a hosted Python
//! kernel that has no Rust toolchain installed.
//!
//! This library provides:
//! - Notebook loading, source normalization and atomic storage
//! - The setup-cell transformation and its idempotency check
//! - Conversion of raw Rust cells into compile-and-run bash cells
//! - File discovery and the per-file processing loop

pub mod config;
pub mod discovery;
pub mod notebook;
pub mod runner;
pub mod transform;

pub use config::Config;
pub use discovery::{discover, NamePattern};
pub use notebook::{Cell, CellKind, Notebook};
pub use runner::{process, run, Outcome, ProcessOptions, RunSummary};
