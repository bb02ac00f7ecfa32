/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template compiler.
//!
//! Consumes the token stream of a [`Matcher`] and builds the part list.
//! Block bodies are compiled by recursive calls that share the token
//! iterator, so the recursion itself is the stack of open blocks: an inner
//! `end` or `else` always binds to the innermost open block.

use crate::ast::{Conditional, Directive, Loop, Part};
use crate::error::{TemplateError, TemplateResult};
use crate::matcher::{DirectiveKind, DirectiveMatch, Matcher, Token, Tokens};
use crate::resolver::ValuePath;
use crate::syntax::Syntax;
use once_cell::sync::Lazy;

/// Matcher for the default syntax, built once.
static DEFAULT_MATCHER: Lazy<TemplateResult<Matcher>> =
    Lazy::new(|| Matcher::new(&Syntax::default()));

/// A compiled template ready for evaluation.
///
/// Immutable once compiled; render it any number of times, from any number
/// of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    /// The compiled parts, in rendering order.
    pub(crate) parts: Vec<Part>,
}

/// The block a recursive compile call is filling.
#[derive(Debug, Clone, Copy)]
enum Frame {
    /// Top level: no block is open.
    Root,
    /// A loop body, opened at the given offset.
    Loop { opened_at: usize },
    /// The "then" branch of a conditional.
    Then { opened_at: usize },
    /// The "else" branch of a conditional.
    Else { opened_at: usize },
}

/// How a recursive compile call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closer {
    EndOfInput,
    Terminator,
    Alternative,
}

/// The parts of one scope and the token that closed it.
#[derive(Debug)]
struct PartialParse {
    parts: Vec<Part>,
    closed_by: Closer,
}

impl Template {
    /// Compile a template using the default syntax.
    ///
    /// # Arguments
    /// * `source` - The template source text
    ///
    /// # Returns
    /// A compiled template, or the first structural error found.
    pub fn compile(source: &str) -> TemplateResult<Self> {
        let matcher = DEFAULT_MATCHER.as_ref().map_err(Clone::clone)?;
        Self::compile_with_matcher(source, matcher)
    }

    /// Compile a template using a custom syntax.
    pub fn compile_with_syntax(source: &str, syntax: &Syntax) -> TemplateResult<Self> {
        if *syntax == Syntax::default() {
            return Self::compile(source);
        }
        Self::compile_with_matcher(source, &Matcher::new(syntax)?)
    }

    /// Compile a template with an already built matcher.
    ///
    /// Use this to compile many templates with the same custom syntax
    /// without recompiling its patterns each time.
    pub fn compile_with_matcher(source: &str, matcher: &Matcher) -> TemplateResult<Self> {
        let mut tokens = matcher.tokens(source);
        let parsed = compile_scope(&mut tokens, Frame::Root).inspect_err(|e| {
            tracing::debug!(error = %e, "template compilation failed");
        })?;
        debug_assert_eq!(parsed.closed_by, Closer::EndOfInput);

        tracing::debug!(
            parts = parsed.parts.len(),
            bytes = source.len(),
            "compiled template"
        );
        Ok(Template {
            parts: parsed.parts,
        })
    }

    /// Get the compiled parts of this template.
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }
}

/// Compile tokens until the current frame is closed.
fn compile_scope(tokens: &mut Tokens<'_, '_>, frame: Frame) -> TemplateResult<PartialParse> {
    let mut parts = Vec::new();

    while let Some(token) = tokens.next() {
        let directive = match token {
            Token::Literal { text, .. } => {
                parts.push(Part::Literal(text.to_string()));
                continue;
            }
            Token::Directive(directive) => directive,
        };

        match directive.kind {
            DirectiveKind::Escape => {
                parts.push(Part::Dynamic(Directive::Escape(path_of(&directive))));
            }
            DirectiveKind::Interpolate => {
                parts.push(Part::Dynamic(Directive::Interpolate(path_of(&directive))));
            }
            DirectiveKind::LoopOpen => {
                let body = compile_scope(
                    tokens,
                    Frame::Loop {
                        opened_at: directive.start,
                    },
                )?;
                let alias = directive.alias.unwrap_or_default().trim();
                parts.push(Part::Dynamic(Directive::Loop(Loop::new(
                    path_of(&directive),
                    alias,
                    body.parts,
                ))));
            }
            DirectiveKind::ConditionalOpen => {
                let opened_at = directive.start;
                let then_branch = compile_scope(tokens, Frame::Then { opened_at })?;
                let else_branch = match then_branch.closed_by {
                    Closer::Alternative => {
                        Some(compile_scope(tokens, Frame::Else { opened_at })?.parts)
                    }
                    _ => None,
                };
                parts.push(Part::Dynamic(Directive::Conditional(Conditional {
                    condition: path_of(&directive),
                    then_branch: then_branch.parts,
                    else_branch,
                })));
            }
            DirectiveKind::Alternative => {
                return match frame {
                    Frame::Then { .. } => Ok(PartialParse {
                        parts,
                        closed_by: Closer::Alternative,
                    }),
                    Frame::Root | Frame::Loop { .. } | Frame::Else { .. } => {
                        Err(TemplateError::UnexpectedElse {
                            offset: directive.start,
                        })
                    }
                };
            }
            DirectiveKind::Terminator => {
                return match frame {
                    Frame::Root => Err(TemplateError::UnexpectedEnd {
                        offset: directive.start,
                    }),
                    Frame::Loop { .. } | Frame::Then { .. } | Frame::Else { .. } => {
                        Ok(PartialParse {
                            parts,
                            closed_by: Closer::Terminator,
                        })
                    }
                };
            }
        }
    }

    match frame {
        Frame::Root => Ok(PartialParse {
            parts,
            closed_by: Closer::EndOfInput,
        }),
        Frame::Loop { opened_at } => Err(TemplateError::UnterminatedLoop { offset: opened_at }),
        Frame::Then { opened_at } | Frame::Else { opened_at } => {
            Err(TemplateError::UnterminatedIf { offset: opened_at })
        }
    }
}

fn path_of(directive: &DirectiveMatch<'_>) -> ValuePath {
    ValuePath::parse(directive.path.unwrap_or_default())
}
