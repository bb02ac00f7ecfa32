/*
 * syntax.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive syntax configuration.
//!
//! Each directive kind is recognized by one regular expression. Every field
//! can be overridden independently; omitted fields keep their defaults, both
//! through the builder methods and when deserializing a partial document.
//! Keys that name no directive kind are ignored.
//!
//! # Capture groups
//!
//! - `escape`, `interpolate`, `conditional`: the path expression, taken from
//!   the named group `path` if present, otherwise the first group.
//! - `loop`: the collection path and alias name, taken from the named groups
//!   `collection` and `alias` if present, otherwise the first two groups.
//! - `alternative`, `terminate`: no captures are needed.

use serde::{Deserialize, Serialize};

/// Default escape directive: `<%- expr %>`
pub const DEFAULT_ESCAPE: &str = r"<%-([\s\S]+?)%>";

/// Default raw interpolation directive: `<%= expr %>`
pub const DEFAULT_INTERPOLATE: &str = r"<%=([\s\S]+?)%>";

/// Default loop opener: `<% for (collection, alias) %>`
pub const DEFAULT_LOOP: &str = r"<%\s*for\s*\(\s*([^,)]+?)\s*,\s*([^)]+?)\s*\)\s*%>";

/// Default conditional opener: `<% if (expr) %>`
pub const DEFAULT_CONDITIONAL: &str = r"<%\s*if\s*\(([^)]+?)\)\s*%>";

/// Default alternative: `<% else %>`
pub const DEFAULT_ALTERNATIVE: &str = r"<%\s*(else)\s*%>";

/// Default terminator: `<% end %>`
pub const DEFAULT_TERMINATE: &str = r"<%\s*(end)\s*%>";

/// The regular expressions recognizing each directive kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Syntax {
    /// Escaped interpolation.
    pub escape: String,

    /// Raw interpolation.
    pub interpolate: String,

    /// Loop block opener.
    #[serde(rename = "loop")]
    pub loop_open: String,

    /// Conditional block opener.
    pub conditional: String,

    /// Branch separator inside a conditional.
    pub alternative: String,

    /// Closes a loop or conditional block.
    pub terminate: String,
}

impl Default for Syntax {
    fn default() -> Self {
        Self {
            escape: DEFAULT_ESCAPE.to_string(),
            interpolate: DEFAULT_INTERPOLATE.to_string(),
            loop_open: DEFAULT_LOOP.to_string(),
            conditional: DEFAULT_CONDITIONAL.to_string(),
            alternative: DEFAULT_ALTERNATIVE.to_string(),
            terminate: DEFAULT_TERMINATE.to_string(),
        }
    }
}

impl Syntax {
    /// Keys accepted in a syntax document.
    pub const KEYS: [&'static str; 6] = [
        "escape",
        "interpolate",
        "loop",
        "conditional",
        "alternative",
        "terminate",
    ];

    /// The default syntax.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the escaped interpolation pattern.
    pub fn with_escape(mut self, pattern: impl Into<String>) -> Self {
        self.escape = pattern.into();
        self
    }

    /// Replace the raw interpolation pattern.
    pub fn with_interpolate(mut self, pattern: impl Into<String>) -> Self {
        self.interpolate = pattern.into();
        self
    }

    /// Replace the loop opener. It needs a collection and an alias capture.
    pub fn with_loop(mut self, pattern: impl Into<String>) -> Self {
        self.loop_open = pattern.into();
        self
    }

    /// Replace the conditional opener.
    pub fn with_conditional(mut self, pattern: impl Into<String>) -> Self {
        self.conditional = pattern.into();
        self
    }

    /// Replace the `else` separator.
    pub fn with_alternative(mut self, pattern: impl Into<String>) -> Self {
        self.alternative = pattern.into();
        self
    }

    /// Replace the block terminator.
    pub fn with_terminate(mut self, pattern: impl Into<String>) -> Self {
        self.terminate = pattern.into();
        self
    }
}
