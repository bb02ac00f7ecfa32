/*
 * matcher.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Directive tokenizer.
//!
//! The [`Matcher`] holds one compiled regex per directive kind, in priority
//! order. Scanning yields literal spans and directive matches left to right.
//! At each step the directive whose match starts earliest wins, and ties go
//! to the kind listed first. This is the same choice a single alternation
//! `escape|interpolate|loop|conditional|alternative|terminate|$` makes, but
//! each pattern keeps its own capture group numbering and names.

use crate::error::{TemplateError, TemplateResult};
use crate::syntax::Syntax;
use regex::{Captures, Regex};

/// The kind of a recognized directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Escaped interpolation: `<%- path %>`
    Escape,
    /// Raw interpolation: `<%= path %>`
    Interpolate,
    /// Loop opener: `<% for (collection, alias) %>`
    LoopOpen,
    /// Conditional opener: `<% if (path) %>`
    ConditionalOpen,
    /// Branch separator: `<% else %>`
    Alternative,
    /// Block terminator: `<% end %>`
    Terminator,
}

impl DirectiveKind {
    /// All kinds, in matching priority order.
    pub const ALL: [DirectiveKind; 6] = [
        DirectiveKind::Escape,
        DirectiveKind::Interpolate,
        DirectiveKind::LoopOpen,
        DirectiveKind::ConditionalOpen,
        DirectiveKind::Alternative,
        DirectiveKind::Terminator,
    ];

    /// The configuration name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            DirectiveKind::Escape => "escape",
            DirectiveKind::Interpolate => "interpolate",
            DirectiveKind::LoopOpen => "loop",
            DirectiveKind::ConditionalOpen => "conditional",
            DirectiveKind::Alternative => "alternative",
            DirectiveKind::Terminator => "terminate",
        }
    }

    fn pattern(self, syntax: &Syntax) -> &str {
        match self {
            DirectiveKind::Escape => &syntax.escape,
            DirectiveKind::Interpolate => &syntax.interpolate,
            DirectiveKind::LoopOpen => &syntax.loop_open,
            DirectiveKind::ConditionalOpen => &syntax.conditional,
            DirectiveKind::Alternative => &syntax.alternative,
            DirectiveKind::Terminator => &syntax.terminate,
        }
    }
}

/// A recognized directive at some offset in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveMatch<'t> {
    pub kind: DirectiveKind,
    /// Path expression (the collection path, for loops), untrimmed.
    pub path: Option<&'t str>,
    /// Loop alias name, untrimmed.
    pub alias: Option<&'t str>,
    /// The full matched directive text.
    pub raw: &'t str,
    /// Byte offset of the start of the match.
    pub start: usize,
    /// Byte offset just past the end of the match.
    pub end: usize,
}

/// An item produced by scanning a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'t> {
    /// Verbatim text between directives.
    Literal { text: &'t str, offset: usize },
    /// A recognized directive.
    Directive(DirectiveMatch<'t>),
}

/// Capture group indices a directive pattern provides.
#[derive(Debug, Clone, Copy, Default)]
struct Slots {
    path: Option<usize>,
    alias: Option<usize>,
}

#[derive(Debug, Clone)]
struct Rule {
    kind: DirectiveKind,
    regex: Regex,
    slots: Slots,
}

impl Rule {
    fn new(kind: DirectiveKind, pattern: &str) -> TemplateResult<Self> {
        let invalid = |message: String| TemplateError::InvalidPattern {
            directive: kind.name(),
            message,
        };

        let regex = Regex::new(pattern).map_err(|e| invalid(e.to_string()))?;
        let named = |name: &str| regex.capture_names().position(|n| n == Some(name));
        let groups = regex.captures_len() - 1;

        let slots = match kind {
            DirectiveKind::Escape | DirectiveKind::Interpolate | DirectiveKind::ConditionalOpen => {
                let path = named("path").or((groups >= 1).then_some(1));
                if path.is_none() {
                    return Err(invalid(
                        "expected a `path` group or at least one capture group".to_string(),
                    ));
                }
                Slots { path, alias: None }
            }
            DirectiveKind::LoopOpen => match (named("collection"), named("alias")) {
                (Some(collection), Some(alias)) => Slots {
                    path: Some(collection),
                    alias: Some(alias),
                },
                _ if groups >= 2 => Slots {
                    path: Some(1),
                    alias: Some(2),
                },
                _ => {
                    return Err(invalid(
                        "expected `collection` and `alias` groups or at least two capture groups"
                            .to_string(),
                    ));
                }
            },
            DirectiveKind::Alternative | DirectiveKind::Terminator => Slots::default(),
        };

        Ok(Self { kind, regex, slots })
    }

    /// Find the first non-empty match starting at or after `from`.
    fn find_at<'t>(&self, text: &'t str, mut from: usize) -> Option<Captures<'t>> {
        while from <= text.len() {
            let caps = self.regex.captures_at(text, from)?;
            let m = caps.get(0)?;
            if !m.is_empty() {
                return Some(caps);
            }
            // An empty match cannot advance the cursor; retry past it.
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
        }
        None
    }
}

/// The compiled directive patterns for one [`Syntax`].
///
/// A matcher is immutable and can be shared between threads and reused
/// across any number of compilations.
#[derive(Debug, Clone)]
pub struct Matcher {
    rules: Vec<Rule>,
}

impl Matcher {
    /// Compile the patterns of a syntax configuration.
    pub fn new(syntax: &Syntax) -> TemplateResult<Self> {
        let rules = DirectiveKind::ALL
            .iter()
            .map(|&kind| Rule::new(kind, kind.pattern(syntax)))
            .collect::<TemplateResult<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Scan a template, yielding literal spans and directives in order.
    pub fn tokens<'m, 't>(&'m self, text: &'t str) -> Tokens<'m, 't> {
        Tokens {
            matcher: self,
            text,
            cursor: 0,
            upcoming: self.rules.iter().map(|_| Upcoming::Unknown).collect(),
            pending: None,
            finished: false,
        }
    }
}

/// Cached next match of one rule.
#[derive(Debug)]
enum Upcoming<'t> {
    /// Not searched since the cursor passed the last result.
    Unknown,
    /// No further match exists.
    Exhausted,
    Found(Captures<'t>),
}

/// Iterator over the tokens of a template. See [`Matcher::tokens`].
#[derive(Debug)]
pub struct Tokens<'m, 't> {
    matcher: &'m Matcher,
    text: &'t str,
    cursor: usize,
    upcoming: Vec<Upcoming<'t>>,
    pending: Option<DirectiveMatch<'t>>,
    finished: bool,
}

impl<'t> Tokens<'_, 't> {
    /// Current byte offset of the scan.
    pub fn offset(&self) -> usize {
        self.cursor
    }

    fn next_directive(&mut self) -> Option<DirectiveMatch<'t>> {
        let mut best: Option<(usize, usize)> = None; // (start, rule index)

        for (i, rule) in self.matcher.rules.iter().enumerate() {
            let stale = match &self.upcoming[i] {
                Upcoming::Unknown => true,
                Upcoming::Exhausted => false,
                Upcoming::Found(caps) => caps.get(0).is_none_or(|m| m.start() < self.cursor),
            };
            if stale {
                self.upcoming[i] = match rule.find_at(self.text, self.cursor) {
                    Some(caps) => Upcoming::Found(caps),
                    None => Upcoming::Exhausted,
                };
            }
            if let Upcoming::Found(caps) = &self.upcoming[i] {
                let start = caps.get(0).map_or(usize::MAX, |m| m.start());
                if best.is_none_or(|(best_start, _)| start < best_start) {
                    best = Some((start, i));
                }
            }
        }

        let (_, i) = best?;
        let Upcoming::Found(caps) = std::mem::replace(&mut self.upcoming[i], Upcoming::Unknown)
        else {
            return None;
        };
        let rule = &self.matcher.rules[i];
        let whole = caps.get(0)?;
        let capture = |slot: Option<usize>| slot.and_then(|g| caps.get(g)).map(|m| m.as_str());

        Some(DirectiveMatch {
            kind: rule.kind,
            path: capture(rule.slots.path),
            alias: capture(rule.slots.alias),
            raw: whole.as_str(),
            start: whole.start(),
            end: whole.end(),
        })
    }
}

impl<'t> Iterator for Tokens<'_, 't> {
    type Item = Token<'t>;

    fn next(&mut self) -> Option<Token<'t>> {
        if let Some(directive) = self.pending.take() {
            return Some(Token::Directive(directive));
        }
        if self.finished {
            return None;
        }

        let start = self.cursor;
        match self.next_directive() {
            Some(directive) => {
                self.cursor = directive.end;
                tracing::trace!(
                    kind = directive.kind.name(),
                    offset = directive.start,
                    "matched directive"
                );
                if directive.start == start {
                    Some(Token::Directive(directive))
                } else {
                    let text = &self.text[start..directive.start];
                    self.pending = Some(directive);
                    Some(Token::Literal {
                        text,
                        offset: start,
                    })
                }
            }
            None => {
                // End-of-input: emit the literal tail
                self.finished = true;
                self.cursor = self.text.len();
                let text = &self.text[start..];
                (!text.is_empty()).then_some(Token::Literal {
                    text,
                    offset: start,
                })
            }
        }
    }
}
