/*
 * evaluator.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Template evaluation engine.
//!
//! Rendering walks the part list in order, appending literal text and the
//! output of each dynamic part to a single buffer. Loop iterations layer
//! their alias bindings over the enclosing scope; neither the context nor
//! the template is ever mutated.

use crate::ast::{Conditional, Directive, Loop, Part};
use crate::context::{TemplateContext, TemplateValue};
use crate::escape::escape_html;
use crate::parser::Template;
use crate::resolver::{Lookup, resolve};

impl Template {
    /// Render this template with the given context.
    ///
    /// Rendering cannot fail: missing values render as the empty string.
    pub fn render(&self, context: &TemplateContext) -> String {
        let mut out = String::new();
        render_parts(&self.parts, &Scope::Root(context), &mut out);
        out
    }

    /// Convert this template into a plain render function.
    pub fn into_render_fn(self) -> impl Fn(&TemplateContext) -> String + Send + Sync {
        move |context: &TemplateContext| self.render(context)
    }
}

/// Variable scope during rendering.
enum Scope<'a> {
    /// The caller's context.
    Root(&'a TemplateContext),
    /// One loop iteration layered over its enclosing scope.
    Iteration {
        parent: &'a Scope<'a>,
        alias: &'a str,
        item: &'a TemplateValue,
        index_name: &'a str,
        index: TemplateValue,
    },
}

impl Lookup for Scope<'_> {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        match self {
            Scope::Root(context) => context.get(name),
            Scope::Iteration {
                parent,
                alias,
                item,
                index_name,
                index,
            } => {
                if name == *alias {
                    Some(*item)
                } else if name == *index_name {
                    Some(index)
                } else {
                    parent.lookup(name)
                }
            }
        }
    }
}

fn render_parts(parts: &[Part], scope: &Scope<'_>, out: &mut String) {
    for part in parts {
        match part {
            Part::Literal(text) => out.push_str(text),
            Part::Dynamic(directive) => render_directive(directive, scope, out),
        }
    }
}

fn render_directive(directive: &Directive, scope: &Scope<'_>, out: &mut String) {
    match directive {
        Directive::Escape(path) => out.push_str(&escape_html(&resolve(path, scope).render())),
        Directive::Interpolate(path) => out.push_str(&resolve(path, scope).render()),
        Directive::Loop(lp) => render_loop(lp, scope, out),
        Directive::Conditional(cond) => render_conditional(cond, scope, out),
    }
}

fn render_loop(lp: &Loop, scope: &Scope<'_>, out: &mut String) {
    let items = resolve(&lp.collection, scope).loop_items();

    for (i, item) in items.iter().enumerate() {
        let child = Scope::Iteration {
            parent: scope,
            alias: &lp.alias,
            item,
            index_name: &lp.index_name,
            index: TemplateValue::Number(i as f64),
        };
        render_parts(&lp.body, &child, out);
    }
}

fn render_conditional(cond: &Conditional, scope: &Scope<'_>, out: &mut String) {
    if resolve(&cond.condition, scope).is_truthy() {
        render_parts(&cond.then_branch, scope, out);
    } else if let Some(else_branch) = &cond.else_branch {
        render_parts(else_branch, scope, out);
    }
}
