/*
 * input.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading of data contexts, syntax overrides and template sources.

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::Path;
use undertemplate::{Syntax, TemplateContext, TemplateError};

/// Data file formats accepted by `--data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
}

impl DataFormat {
    /// Pick the format from a file extension. Unknown extensions are read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => DataFormat::Yaml,
            _ => DataFormat::Json,
        }
    }
}

/// Parse a data document into a template context.
///
/// The document root must be an object/mapping.
pub fn parse_context(text: &str, format: DataFormat) -> Result<TemplateContext> {
    let value: serde_json::Value = match format {
        DataFormat::Json => serde_json::from_str(text).context("Invalid JSON data")?,
        DataFormat::Yaml => serde_yaml::from_str(text).context("Invalid YAML data")?,
    };

    match value {
        serde_json::Value::Object(entries) => Ok(TemplateContext::from(entries)),
        serde_json::Value::Null => Ok(TemplateContext::new()),
        other => bail!(
            "Data root must be an object, found {}",
            match other {
                serde_json::Value::Bool(_) => "a boolean",
                serde_json::Value::Number(_) => "a number",
                serde_json::Value::String(_) => "a string",
                _ => "an array",
            }
        ),
    }
}

/// Load the data context from a file, or an empty context when no file is given.
pub fn load_context(path: Option<&Path>) -> Result<TemplateContext> {
    let Some(path) = path else {
        return Ok(TemplateContext::new());
    };
    let text =
        fs::read_to_string(path).context(format!("Failed to read data file: {:?}", path))?;
    parse_context(&text, DataFormat::from_path(path))
        .context(format!("Failed to load data file: {:?}", path))
}

/// Load a syntax override file, or the default syntax when no file is given.
pub fn load_syntax(path: Option<&Path>) -> Result<Syntax> {
    let Some(path) = path else {
        return Ok(Syntax::default());
    };
    let text =
        fs::read_to_string(path).context(format!("Failed to read syntax file: {:?}", path))?;
    let table: toml::Table =
        toml::from_str(&text).context(format!("Invalid syntax file: {:?}", path))?;
    for key in table.keys().filter(|key| !Syntax::KEYS.contains(&key.as_str())) {
        tracing::warn!(key = %key, file = ?path, "Ignoring unknown syntax key");
    }
    toml::Value::Table(table)
        .try_into()
        .context(format!("Invalid syntax file: {:?}", path))
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(source.len());
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let column = before
        .rfind('\n')
        .map_or(before.chars().count(), |nl| before[nl + 1..].chars().count())
        + 1;
    (line, column)
}

/// Format a compile error with the template location it refers to.
pub fn describe_error(path: &Path, source: &str, err: &TemplateError) -> String {
    match err.offset() {
        Some(offset) => {
            let (line, column) = line_col(source, offset);
            format!("{}:{}:{}: {}", path.display(), line, column, err)
        }
        None => format!("{}: {}", path.display(), err),
    }
}
