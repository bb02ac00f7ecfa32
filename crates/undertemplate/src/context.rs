/*
 * context.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template value and context types.
//!
//! This module defines the values a template can look up at render time and
//! the top-level [`TemplateContext`] that holds them. Conversion from JSON
//! (and anything `serde_json` can read) goes through `From<serde_json::Value>`.

use indexmap::IndexMap;
use std::borrow::Cow;
use std::fmt;

/// A value that can be used in template evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    /// A null/missing value.
    Null,

    /// A boolean value.
    Bool(bool),

    /// A numeric value.
    Number(f64),

    /// A string value.
    String(String),

    /// A list of values.
    List(Vec<TemplateValue>),

    /// A map of string keys to values, in insertion order.
    Map(IndexMap<String, TemplateValue>),
}

impl TemplateValue {
    /// Check if this value is "truthy" for conditional evaluation.
    ///
    /// Truthiness rules:
    /// - `Null`, `false`, `0`, `NaN` and the empty string are falsy
    /// - Everything else is truthy, including empty lists and empty maps
    pub fn is_truthy(&self) -> bool {
        match self {
            TemplateValue::Null => false,
            TemplateValue::Bool(b) => *b,
            TemplateValue::Number(n) => *n != 0.0 && !n.is_nan(),
            TemplateValue::String(s) => !s.is_empty(),
            TemplateValue::List(_) | TemplateValue::Map(_) => true,
        }
    }

    /// Get a direct child by key.
    ///
    /// Maps are indexed by key; lists by a decimal index (`"0"`, `"1"`, ...).
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Map(m) => m.get(key),
            TemplateValue::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Get a nested value by path.
    ///
    /// For example, `get_path(&["people", "0", "name"])` on a Map containing
    /// `{"people": [{"name": "Ann"}]}` returns the name value.
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&TemplateValue> {
        path.iter()
            .try_fold(self, |value, segment| value.get(segment.as_ref()))
    }

    /// The items a loop over this value iterates.
    ///
    /// - List: its items
    /// - Map: its values, in insertion order
    /// - String: one single-character string per character
    /// - Anything else: nothing
    pub fn loop_items(&self) -> Vec<Cow<'_, TemplateValue>> {
        match self {
            TemplateValue::List(items) => items.iter().map(Cow::Borrowed).collect(),
            TemplateValue::Map(m) => m.values().map(Cow::Borrowed).collect(),
            TemplateValue::String(s) => s
                .chars()
                .map(|c| Cow::Owned(TemplateValue::String(c.to_string())))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Render this value as a string for output.
    ///
    /// - String: returned as-is
    /// - Number: shortest form, integral values without a fraction
    /// - Bool: "true" or "false"
    /// - List: rendered items joined with ","
    /// - Map, Null: ""
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            TemplateValue::String(s) => Cow::Borrowed(s),
            TemplateValue::Null | TemplateValue::Map(_) => Cow::Borrowed(""),
            _ => Cow::Owned(self.to_string()),
        }
    }
}

impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::Null | TemplateValue::Map(_) => Ok(()),
            TemplateValue::Bool(b) => write!(f, "{}", b),
            TemplateValue::Number(n) => fmt_number(*n, f),
            TemplateValue::String(s) => f.write_str(s),
            TemplateValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

fn fmt_number(n: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if n.is_infinite() {
        f.write_str(if n > 0.0 { "Infinity" } else { "-Infinity" })
    } else if n == 0.0 {
        // -0 prints as 0
        f.write_str("0")
    } else {
        // Exponent form outside 1e-7 < |n| < 1e21, as `1e+21` and `1.5e-7`.
        let exp = format!("{:e}", n);
        match exp.split_once('e') {
            Some((mantissa, power)) => match power.parse::<i32>() {
                Ok(p) if p >= 21 => write!(f, "{}e+{}", mantissa, p),
                Ok(p) if p <= -7 => write!(f, "{}e{}", mantissa, p),
                _ => write!(f, "{}", n),
            },
            None => write!(f, "{}", n),
        }
    }
}

impl Default for TemplateValue {
    fn default() -> Self {
        TemplateValue::Null
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

impl From<f64> for TemplateValue {
    fn from(value: f64) -> Self {
        TemplateValue::Number(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Number(value as f64)
    }
}

impl From<i32> for TemplateValue {
    fn from(value: i32) -> Self {
        TemplateValue::Number(f64::from(value))
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::String(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::String(value)
    }
}

impl<T: Into<TemplateValue>> From<Vec<T>> for TemplateValue {
    fn from(items: Vec<T>) -> Self {
        TemplateValue::List(items.into_iter().map(Into::into).collect())
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateValue {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        TemplateValue::Map(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<serde_json::Value> for TemplateValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TemplateValue::Null,
            serde_json::Value::Bool(b) => TemplateValue::Bool(b),
            serde_json::Value::Number(n) => n
                .as_f64()
                .map_or(TemplateValue::Null, TemplateValue::Number),
            serde_json::Value::String(s) => TemplateValue::String(s),
            serde_json::Value::Array(items) => {
                TemplateValue::List(items.into_iter().map(TemplateValue::from).collect())
            }
            serde_json::Value::Object(entries) => TemplateValue::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, TemplateValue::from(v)))
                    .collect(),
            ),
        }
    }
}

/// The top-level variable bindings a template is rendered against.
///
/// A context is never mutated by rendering. Loop aliases are layered over it
/// for the duration of each iteration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateContext {
    variables: IndexMap<String, TemplateValue>,
}

impl TemplateContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<TemplateValue>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Get a top-level variable.
    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.variables.get(key)
    }

    /// Get a variable by path (e.g., `["employee", "salary"]`).
    pub fn get_path<S: AsRef<str>>(&self, path: &[S]) -> Option<&TemplateValue> {
        let (first, rest) = path.split_first()?;
        self.get(first.as_ref()).and_then(|v| v.get_path(rest))
    }

    /// Number of top-level variables.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether the context has no variables.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for TemplateContext {
    fn from(entries: serde_json::Map<String, serde_json::Value>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<IndexMap<String, TemplateValue>> for TemplateContext {
    fn from(variables: IndexMap<String, TemplateValue>) -> Self {
        Self { variables }
    }
}

impl<K: Into<String>, V: Into<TemplateValue>> FromIterator<(K, V)> for TemplateContext {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            variables: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
