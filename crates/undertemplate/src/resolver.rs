/*
 * resolver.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Value path parsing and permissive lookup.
//!
//! A path expression such as `data.people[0].firstName` is split into
//! segments once, at compile time. Lookup walks the segments against a
//! [`Lookup`] scope and never fails: any miss resolves to the empty string.

use crate::context::{TemplateContext, TemplateValue};

/// The value returned for every lookup miss.
static EMPTY: TemplateValue = TemplateValue::String(String::new());

/// A source of top-level variables for path resolution.
///
/// Implemented by [`TemplateContext`] and by the evaluator's loop scopes,
/// which layer an alias binding over their enclosing scope.
pub trait Lookup {
    /// Get a top-level variable by name.
    fn lookup(&self, name: &str) -> Option<&TemplateValue>;
}

impl Lookup for TemplateContext {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        self.get(name)
    }
}

/// A parsed dotted/bracketed path expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValuePath {
    /// The trimmed source expression.
    source: String,
    /// Path segments, e.g. `["people", "0", "firstName"]`.
    segments: Vec<String>,
}

impl ValuePath {
    /// Parse a path expression.
    ///
    /// Surrounding whitespace is trimmed. Supported forms:
    /// - `a.b.c` dotted keys
    /// - `a[0]` / `a[key]` bracketed keys or indices
    /// - `a["some key"]` / `a['some key']` quoted bracketed keys
    pub fn parse(expr: &str) -> Self {
        let source = expr.trim();
        Self {
            source: source.to_string(),
            segments: split_segments(source),
        }
    }

    /// The trimmed source expression.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The parsed segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

fn split_segments(source: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '.' => segments.push(std::mem::take(&mut current)),
            '[' => {
                if !current.is_empty() {
                    segments.push(std::mem::take(&mut current));
                }
                let mut key = String::new();
                let mut closed = false;
                match chars.peek().copied() {
                    Some(quote @ ('"' | '\'')) => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == quote {
                                break;
                            }
                            key.push(c);
                        }
                        // Skip anything up to the closing bracket
                        for c in chars.by_ref() {
                            if c == ']' {
                                closed = true;
                                break;
                            }
                        }
                    }
                    _ => {
                        for c in chars.by_ref() {
                            if c == ']' {
                                closed = true;
                                break;
                            }
                            key.push(c);
                        }
                        key = key.trim().to_string();
                    }
                }
                if !closed {
                    // Unclosed bracket: keep the remainder as a literal key
                    current = format!("[{}", key);
                    continue;
                }
                segments.push(key);
                // `a[0].b`: the dot after a bracket does not start an empty segment
                if chars.peek() == Some(&'.') {
                    chars.next();
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Resolve a path against a scope.
///
/// Never fails: a missing variable, key, or out-of-range index yields the
/// empty string.
pub fn resolve<'a, L: Lookup + ?Sized>(path: &ValuePath, scope: &'a L) -> &'a TemplateValue {
    let Some((first, rest)) = path.segments.split_first() else {
        return &EMPTY;
    };
    scope
        .lookup(first)
        .and_then(|root| root.get_path(rest))
        .unwrap_or(&EMPTY)
}
