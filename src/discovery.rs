//! Notebook discovery.
//!
//! Lists the files in a directory whose names match a glob pattern
//! (`*`, `?`, `[...]` classes, `{a,b}` alternatives). Matching is on the
//! file name only and does not descend into subdirectories.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

/// Pattern used when none is configured
pub const DEFAULT_PATTERN: &str = "chapter_*.ipynb";

/// Compiled file-name pattern
#[derive(Debug, Clone)]
pub struct NamePattern {
    glob: String,
    matcher: GlobMatcher,
}

impl NamePattern {
    pub fn new(glob: &str) -> Result<Self> {
        let matcher = Glob::new(glob)
            .with_context(|| format!("invalid file pattern '{}'", glob))?
            .compile_matcher();
        Ok(Self {
            glob: glob.to_string(),
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.matcher.is_match(file_name)
    }
}

/// Regular files in `dir` whose names match `pattern`, sorted by path
pub fn discover(dir: &Path, pattern: &NamePattern) -> Result<Vec<PathBuf>> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        match entry.file_name().to_str() {
            Some(name) if pattern.matches(name) => found.push(path),
            Some(_) => {}
            None => log::debug!("skipping non UTF-8 file name {}", path.display()),
        }
    }

    found.sort();
    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_pattern() {
        let pattern = NamePattern::new(DEFAULT_PATTERN).unwrap();
        assert!(pattern.matches("chapter_01.ipynb"));
        assert!(pattern.matches("chapter_.ipynb"));
        assert!(!pattern.matches("chapter_01.ipynb.bak"));
        assert!(!pattern.matches("appendix.ipynb"));
        assert!(!pattern.matches("chapter_01xipynb"));
    }

    #[test]
    fn test_question_mark_and_literals() {
        let pattern = NamePattern::new("lesson-?.(draft).ipynb").unwrap();
        assert!(pattern.matches("lesson-1.(draft).ipynb"));
        assert!(!pattern.matches("lesson-12.(draft).ipynb"));
        assert_eq!(pattern.as_str(), "lesson-?.(draft).ipynb");
    }

    #[test]
    fn test_character_classes() {
        let pattern = NamePattern::new("chapter_[0-9]*.ipynb").unwrap();
        assert!(pattern.matches("chapter_1.ipynb"));
        assert!(pattern.matches("chapter_12_extra.ipynb"));
        assert!(!pattern.matches("chapter_intro.ipynb"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(NamePattern::new("chapter_[0-9.ipynb").is_err());
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        for name in ["chapter_10.ipynb", "chapter_02.ipynb", "notes.ipynb", "chapter_03.md"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("chapter_99.ipynb")).unwrap();

        let pattern = NamePattern::new(DEFAULT_PATTERN).unwrap();
        let found = discover(dir.path(), &pattern).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap())
            .collect();

        assert_eq!(names, ["chapter_02.ipynb", "chapter_10.ipynb"]);
    }

    #[test]
    fn test_discover_missing_directory() {
        let dir = TempDir::new().unwrap();
        let pattern = NamePattern::new(DEFAULT_PATTERN).unwrap();
        assert!(discover(&dir.path().join("nope"), &pattern).is_err());
    }
}
