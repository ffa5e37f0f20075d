//! Notebook transformation
//!
//! Setup-cell injection, metadata rewrite and code-cell wrapping.

pub mod engine;
pub mod setup;

pub use engine::{
    already_processed, annotate_intro, convert_code_cells, insert_setup, rewrite_metadata,
    setup_position, wrap_code_as_executable,
};
pub use setup::{metadata_descriptor, setup_cell, INTRO_NOTICE, SETUP_MARKER};
