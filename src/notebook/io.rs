//! Notebook Storage
//!
//! Reading and writing `.ipynb` files. Writes go through a temporary file in
//! the same directory and are renamed over the target, so a failed write never
//! leaves a truncated notebook behind.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use tempfile::NamedTempFile;

use super::schema::Notebook;

/// Indentation width used when none is configured
pub const DEFAULT_INDENT: usize = 1;

/// Parse notebook JSON text
pub fn parse(text: &str) -> Result<Notebook> {
    serde_json::from_str(text).context("invalid notebook JSON")
}

/// Serialize a notebook, pretty-printed with `indent` spaces per level
pub fn render(notebook: &Notebook, indent: usize) -> Result<Vec<u8>> {
    let indent = vec![b' '; indent];
    let mut out = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&indent));
    notebook
        .serialize(&mut serializer)
        .context("failed to serialize notebook")?;
    Ok(out)
}

/// Load a notebook from disk
pub fn load(path: &Path) -> Result<Notebook> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(&text).with_context(|| format!("failed to parse {}", path.display()))
}

/// Overwrite `path` with the serialized notebook
pub fn store(path: &Path, notebook: &Notebook, indent: usize) -> Result<()> {
    let bytes = render(notebook, indent)?;

    // Write through symlinks to the notebook they point at
    let target = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(&bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("failed to flush {}", path.display()))?;

    // Keep the original file mode rather than the temp file's 0600
    if let Ok(meta) = fs::metadata(&target) {
        fs::set_permissions(tmp.path(), meta.permissions())
            .with_context(|| format!("failed to copy permissions of {}", path.display()))?;
    }

    tmp.persist(&target)
        .map_err(|e| e.error)
        .with_context(|| format!("failed to replace {}", target.display()))?;

    log::debug!("wrote {} bytes to {}", bytes.len(), target.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r##"{
 "cells": [
  {
   "cell_type": "markdown",
   "metadata": {},
   "source": [
    "# Title\n"
   ]
  }
 ],
 "metadata": {},
 "nbformat": 4,
 "nbformat_minor": 5
}"##;

    #[test]
    fn test_render_matches_one_space_layout() {
        let notebook = parse(SAMPLE).unwrap();
        let bytes = render(&notebook, DEFAULT_INDENT).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), SAMPLE);
    }

    #[test]
    fn test_render_keeps_non_ascii() {
        let notebook = parse(r#"{"cells": [{"cell_type": "markdown", "source": "Grüße ✓"}]}"#)
            .unwrap();
        let text = String::from_utf8(render(&notebook, 2).unwrap()).unwrap();
        assert!(text.contains("Grüße ✓"));
        assert!(text.contains("\n  \"cells\""));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("{ not json").is_err());
        assert!(parse(r#"{"cells": {}}"#).is_err());
        assert!(parse(r#"{"cells": [42]}"#).is_err());
    }

    #[test]
    fn test_store_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("chapter_01.ipynb");
        fs::write(&path, "stale").unwrap();

        let notebook = parse(SAMPLE).unwrap();
        store(&path, &notebook, DEFAULT_INDENT).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
        assert_eq!(load(&path).unwrap(), notebook);
        // No leftover temporary files
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_large_integers_round_trip_exactly() {
        let text = r#"{"cells":[],"metadata":{},"nbformat":4,"nbformat_minor":5,"big":123456789012345678901234567890,"ratio":1.0}"#;
        let out = String::from_utf8(render(&parse(text).unwrap(), 0).unwrap()).unwrap();
        assert!(out.contains("123456789012345678901234567890"));
        assert!(out.contains("\"ratio\": 1.0"));
    }

    #[cfg(unix)]
    #[test]
    fn test_store_writes_through_symlink() {
        let dir = TempDir::new().unwrap();
        let real = dir.path().join("real.ipynb");
        let link = dir.path().join("chapter_01.ipynb");
        fs::write(&real, "stale").unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        let notebook = parse(SAMPLE).unwrap();
        store(&link, &notebook, DEFAULT_INDENT).unwrap();

        assert!(fs::symlink_metadata(&link).unwrap().file_type().is_symlink());
        assert_eq!(fs::read_to_string(&real).unwrap(), SAMPLE);
    }

    #[test]
    fn test_load_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.ipynb");
        fs::write(&path, "[").unwrap();

        let err = load(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.ipynb"));
    }
}
