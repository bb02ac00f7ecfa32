/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Micro-templating engine.
//!
//! A template is literal text with embedded directives. With the default
//! syntax:
//!
//! - Escaped interpolation: `<%- person.name %>` (HTML entities substituted)
//! - Raw interpolation: `<%= people[0].name %>`
//! - Loops: `<% for (people, person) %>...<% end %>`, with `person_index`
//!   bound to the zero-based iteration index
//! - Conditionals: `<% if (person.active) %>...<% else %>...<% end %>`
//!
//! Every directive pattern can be replaced through [`Syntax`]. The syntax
//! only decides which text triggers a directive; escaping, iteration order
//! and branch selection are the same for every syntax.
//!
//! # Architecture
//!
//! - [`Matcher`] scans the source into literal spans and directive matches.
//! - [`Template::compile`] builds an ordered part list, recursively compiling
//!   block bodies. Unbalanced blocks are reported as [`TemplateError`]s.
//! - [`Template::render`] concatenates the parts against a
//!   [`TemplateContext`]. Missing paths render as the empty string, so
//!   rendering cannot fail.
//!
//! # Example
//!
//! ```
//! use undertemplate::{Template, TemplateContext};
//!
//! let template = Template::compile("Hello <%= name %>!")?;
//!
//! let mut ctx = TemplateContext::new();
//! ctx.insert("name", "World");
//!
//! assert_eq!(template.render(&ctx), "Hello World!");
//! # Ok::<(), undertemplate::TemplateError>(())
//! ```

pub mod ast;
pub mod context;
pub mod error;
pub mod escape;
pub mod evaluator;
pub mod matcher;
pub mod parser;
pub mod resolver;
pub mod syntax;

// Re-export main types at crate root
pub use ast::{Conditional, Directive, Loop, Part};
pub use context::{TemplateContext, TemplateValue};
pub use error::{TemplateError, TemplateResult};
pub use escape::escape_html;
pub use matcher::{DirectiveKind, DirectiveMatch, Matcher, Token, Tokens};
pub use parser::Template;
pub use resolver::{Lookup, ValuePath, resolve};
pub use syntax::Syntax;

/// Compile a template into a render function.
///
/// `None` selects the default syntax.
///
/// ```
/// use undertemplate::{TemplateContext, compile};
///
/// let render = compile("<%- html %>", None)?;
/// let ctx: TemplateContext = [("html", "<b>")].into_iter().collect();
/// assert_eq!(render(&ctx), "&lt;b&gt;");
/// # Ok::<(), undertemplate::TemplateError>(())
/// ```
pub fn compile(
    source: &str,
    syntax: Option<&Syntax>,
) -> TemplateResult<impl Fn(&TemplateContext) -> String + Send + Sync + use<>> {
    let template = match syntax {
        Some(syntax) => Template::compile_with_syntax(source, syntax)?,
        None => Template::compile(source)?,
    };
    Ok(template.into_render_fn())
}
