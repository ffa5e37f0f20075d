//! Notebook Schema Types
//!
//! Typed view over the `.ipynb` JSON tree. Only the parts the transformer
//! touches are typed; every other field is carried through untouched and in
//! its original key order.

use anyhow::{anyhow, bail, Context, Error};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Root notebook document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Notebook {
    pub cells: Vec<Cell>,
    pub metadata: Map<String, Value>,
    /// Every top-level key; `cells` and `metadata` hold placeholders
    fields: Map<String, Value>,
}

impl Notebook {
    /// Notebook with the given cells and empty metadata
    pub fn new(cells: Vec<Cell>) -> Self {
        let mut fields = Map::new();
        fields.insert("cells".to_string(), Value::Null);
        fields.insert("metadata".to_string(), Value::Null);

        Self {
            cells,
            metadata: Map::new(),
            fields,
        }
    }

    /// Any top-level field other than `cells` and `metadata`
    pub fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "cells" | "metadata" => None,
            _ => self.fields.get(name),
        }
    }
}

impl TryFrom<Map<String, Value>> for Notebook {
    type Error = Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let cells = match fields.get_mut("cells").map(Value::take) {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value).context("invalid cells")?,
        };
        // Replaced wholesale on rewrite, so anything that is not an object
        // is as good as empty
        let metadata = match fields.get_mut("metadata").map(Value::take) {
            Some(Value::Object(map)) => map,
            _ => Map::new(),
        };

        Ok(Self {
            cells,
            metadata,
            fields,
        })
    }
}

impl From<Notebook> for Map<String, Value> {
    fn from(notebook: Notebook) -> Self {
        let mut fields = notebook.fields;
        // Existing keys keep their position, missing ones are appended
        fields.insert(
            "cells".to_string(),
            Value::Array(notebook.cells.into_iter().map(|c| Value::Object(c.into())).collect()),
        );
        fields.insert("metadata".to_string(), Value::Object(notebook.metadata));
        fields
    }
}

/// Cell discriminator (`cell_type`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellKind {
    Code,
    Markdown,
    /// `raw` and anything else, kept as written
    Other(String),
}

impl CellKind {
    pub fn as_str(&self) -> &str {
        match self {
            CellKind::Code => "code",
            CellKind::Markdown => "markdown",
            CellKind::Other(name) => name,
        }
    }
}

impl From<&str> for CellKind {
    fn from(name: &str) -> Self {
        match name {
            "code" => CellKind::Code,
            "markdown" => CellKind::Markdown,
            other => CellKind::Other(other.to_string()),
        }
    }
}

/// A single notebook cell with its source normalized to lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Cell {
    pub kind: CellKind,
    pub source: Vec<String>,
    /// Every key of the cell object; `cell_type` and `source` hold placeholders
    fields: Map<String, Value>,
}

impl Cell {
    /// Fresh code cell with no outputs and an empty execution count
    pub fn code(source: Vec<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("cell_type".to_string(), Value::Null);
        fields.insert("execution_count".to_string(), Value::Null);
        fields.insert("metadata".to_string(), Value::Object(Map::new()));
        fields.insert("outputs".to_string(), Value::Array(Vec::new()));
        fields.insert("source".to_string(), Value::Null);

        Self {
            kind: CellKind::Code,
            source,
            fields,
        }
    }

    /// Markdown cell with empty metadata
    pub fn markdown(source: Vec<String>) -> Self {
        let mut fields = Map::new();
        fields.insert("cell_type".to_string(), Value::Null);
        fields.insert("metadata".to_string(), Value::Object(Map::new()));
        fields.insert("source".to_string(), Value::Null);

        Self {
            kind: CellKind::Markdown,
            source,
            fields,
        }
    }

    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    pub fn is_markdown(&self) -> bool {
        self.kind == CellKind::Markdown
    }

    /// Concatenated source text
    pub fn source_text(&self) -> String {
        self.source.concat()
    }

    /// Any field other than `cell_type` and `source`
    pub fn field(&self, name: &str) -> Option<&Value> {
        match name {
            "cell_type" | "source" => None,
            _ => self.fields.get(name),
        }
    }
}

impl TryFrom<Map<String, Value>> for Cell {
    type Error = Error;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let kind = match fields.get_mut("cell_type").map(Value::take) {
            Some(Value::String(name)) => CellKind::from(name.as_str()),
            Some(other) => bail!("cell_type must be a string, got {other}"),
            None => bail!("cell is missing cell_type"),
        };
        let source = normalize_source(fields.get_mut("source").map(Value::take))?;

        Ok(Self {
            kind,
            source,
            fields,
        })
    }
}

impl From<Cell> for Map<String, Value> {
    fn from(cell: Cell) -> Self {
        let mut fields = cell.fields;
        fields.insert(
            "cell_type".to_string(),
            Value::from(cell.kind.as_str()),
        );
        fields.insert(
            "source".to_string(),
            Value::Array(cell.source.into_iter().map(Value::String).collect()),
        );
        fields
    }
}

/// Coerce a `source` field (string, list of strings, or absent) into lines
fn normalize_source(source: Option<Value>) -> Result<Vec<String>, Error> {
    match source {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(text)) => Ok(split_lines(&text)),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(line) => Ok(line),
                other => Err(anyhow!("source lines must be strings, got {other}")),
            })
            .collect(),
        Some(other) => bail!("source must be a string or a list of strings, got {other}"),
    }
}

/// Split text into lines, each keeping its trailing newline
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_inclusive('\n').map(str::to_string).collect()
}
