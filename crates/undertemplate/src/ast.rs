/*
 * ast.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Compiled template parts.
//!
//! A compiled template is an ordered list of [`Part`]s. Order is rendering
//! order. Block directives own their fully balanced nested part lists.

use crate::resolver::ValuePath;

/// One unit of a compiled template.
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Literal text to be output as-is.
    Literal(String),

    /// A part whose output depends on the data context.
    Dynamic(Directive),
}

/// The behavior of a dynamic part.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Escaped interpolation: `<%- path %>`
    Escape(ValuePath),

    /// Raw interpolation: `<%= path %>`
    Interpolate(ValuePath),

    /// Loop block: `<% for (collection, alias) %>...<% end %>`
    Loop(Loop),

    /// Conditional block: `<% if (path) %>...<% else %>...<% end %>`
    Conditional(Conditional),
}

/// Loop block.
#[derive(Debug, Clone, PartialEq)]
pub struct Loop {
    /// Path of the collection to iterate over.
    pub collection: ValuePath,
    /// Name bound to the current item in the body.
    pub alias: String,
    /// Name bound to the zero-based iteration index (`<alias>_index`).
    pub index_name: String,
    /// Loop body.
    pub body: Vec<Part>,
}

impl Loop {
    /// Build a loop whose index is bound as `<alias>_index`.
    pub fn new(collection: ValuePath, alias: impl Into<String>, body: Vec<Part>) -> Self {
        let alias = alias.into();
        Self {
            collection,
            index_name: format!("{}_index", alias),
            alias,
            body,
        }
    }
}

/// Conditional block.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    /// Path of the value tested for truthiness.
    pub condition: ValuePath,
    /// Rendered when the condition is truthy.
    pub then_branch: Vec<Part>,
    /// Rendered when the condition is falsy, if present.
    pub else_branch: Option<Vec<Part>>,
}
