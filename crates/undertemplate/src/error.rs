/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for template compilation.
//!
//! Every error is raised while compiling. Rendering replays an already
//! validated structure and cannot fail.

use thiserror::Error;

/// Errors that can occur while compiling a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A terminator appeared with no enclosing open block.
    #[error("unexpected end of template structure at offset {offset}")]
    UnexpectedEnd { offset: usize },

    /// An alternative appeared with no enclosing open conditional.
    #[error("unexpected else at offset {offset}")]
    UnexpectedElse { offset: usize },

    /// Input ended while a conditional opened at `offset` was still open.
    #[error("unterminated if (opened at offset {offset})")]
    UnterminatedIf { offset: usize },

    /// Input ended while a loop opened at `offset` was still open.
    #[error("unterminated loop (opened at offset {offset})")]
    UnterminatedLoop { offset: usize },

    /// A directive pattern in the syntax configuration is unusable.
    #[error("invalid {directive} pattern: {message}")]
    InvalidPattern {
        directive: &'static str,
        message: String,
    },
}

impl TemplateError {
    /// Byte offset in the template source the error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            TemplateError::UnexpectedEnd { offset }
            | TemplateError::UnexpectedElse { offset }
            | TemplateError::UnterminatedIf { offset }
            | TemplateError::UnterminatedLoop { offset } => Some(*offset),
            TemplateError::InvalidPattern { .. } => None,
        }
    }
}

/// Result type for template operations.
pub type TemplateResult<T> = Result<T, TemplateError>;
