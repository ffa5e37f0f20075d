//! Transformation Engine
//!
//! The individual notebook rewrites. Each one is a plain function over the
//! in-memory [`Notebook`]; ordering and the idempotency check live in
//! [`crate::runner::process`].

use crate::notebook::{split_lines, Cell, Notebook};

use super::setup::{metadata_descriptor, setup_cell, INTRO_NOTICE, SETUP_MARKER};

/// Heredoc delimiter used when embedding example source in a bash cell
const HEREDOC_DELIMITER: &str = "RUSTCODE";

/// `RUSTCODE`, or `RUSTCODE_1`, `RUSTCODE_2`, ... if the code has a line
/// equal to it
fn heredoc_delimiter(code: &str) -> String {
    let taken = |candidate: &str| code.lines().any(|line| line == candidate);

    let mut delimiter = HEREDOC_DELIMITER.to_string();
    let mut suffix = 0;
    while taken(&delimiter) {
        suffix += 1;
        delimiter = format!("{HEREDOC_DELIMITER}_{suffix}");
    }
    delimiter
}

/// Whether the first code cell already contains the setup marker
pub fn already_processed(notebook: &Notebook) -> bool {
    notebook
        .cells
        .iter()
        .find(|cell| cell.is_code())
        .map(|cell| cell.source_text().contains(SETUP_MARKER))
        .unwrap_or(false)
}

/// Add the "run the setup cell first" notice under the title of a leading
/// markdown cell
pub fn annotate_intro(notebook: &mut Notebook) {
    let Some(first) = notebook.cells.first_mut() else {
        return;
    };
    if !first.is_markdown() || first.source.is_empty() {
        return;
    }

    first.source.insert(1, "\n".to_string());
    first.source.insert(2, INTRO_NOTICE.to_string());
}

/// Index at which the setup cell goes: right after a leading markdown cell
pub fn setup_position(notebook: &Notebook) -> usize {
    match notebook.cells.first() {
        Some(cell) if cell.is_markdown() => 1,
        _ => 0,
    }
}

/// Insert the setup cell, returning where it was placed
pub fn insert_setup(notebook: &mut Notebook) -> usize {
    let position = setup_position(notebook);
    notebook.cells.insert(position, setup_cell());
    position
}

/// Replace notebook metadata with the hosted Python kernel descriptor
pub fn rewrite_metadata(notebook: &mut Notebook) {
    notebook.metadata = metadata_descriptor();
}

/// Build a bash cell that compiles and runs the given Rust source.
///
/// `index` names the scratch files (`example_{index}.rs`), so distinct cells
/// in one notebook must use distinct indices. Compiler or runtime failure
/// prints a fallback message instead of failing the cell.
pub fn wrap_code_as_executable(cell_source: &[String], index: usize) -> Cell {
    let mut code = cell_source.concat();
    if !code.is_empty() && !code.ends_with('\n') {
        code.push('\n');
    }
    let delimiter = heredoc_delimiter(&code);

    let script = format!(
        "%%bash\n\
         source $HOME/.cargo/env\n\
         cat > example_{index}.rs << '{delimiter}'\n\
         {code}\
         {delimiter}\n\
         rustc example_{index}.rs 2>&1 && ./example_{index} 2>&1 || echo \"Compilation failed\"\n"
    );

    Cell::code(split_lines(&script))
}

/// Whether a code cell holds raw Rust that should be wrapped
fn is_convertible(cell: &Cell) -> bool {
    if !cell.is_code() {
        return false;
    }
    let text = cell.source_text();
    let trimmed = text.trim_start();
    !trimmed.is_empty()
        && !trimmed.starts_with("%%")
        && !trimmed.starts_with('!')
        && !text.contains(SETUP_MARKER)
}

/// Wrap every raw Rust code cell in place; returns how many were converted
pub fn convert_code_cells(notebook: &mut Notebook) -> usize {
    let mut converted = 0;
    for cell in notebook.cells.iter_mut() {
        if !is_convertible(cell) {
            continue;
        }
        converted += 1;
        *cell = wrap_code_as_executable(&cell.source, converted);
    }
    converted
}
