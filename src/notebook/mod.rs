//! Notebook documents
//!
//! Data model plus load/store.

pub mod io;
pub mod schema;

pub use io::{load, parse, render, store, DEFAULT_INDENT};
pub use schema::{split_lines, Cell, CellKind, Notebook};
