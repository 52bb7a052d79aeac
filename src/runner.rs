//! Pipeline driver: Lex → Parse → Resolve → Interpret.
//!
//! Each static stage reports its own diagnostics; the interpreter never runs
//! on a program that any earlier stage rejected.  At runtime an error aborts
//! only the top-level statement that raised it.  The same [`Lox`] value is
//! reused across prompt lines so globals persist between them.

use std::fmt;
use std::io::Write;

use log::{debug, info};
use thiserror::Error;

use crate::error::LoxError;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::scanner::scan_tokens;

/// Why a run stopped.
#[derive(Debug, Error)]
pub enum RunError {
    /// Lexical, syntax or resolution errors.  Nothing was executed.
    #[error("{}", Diagnostics(.0))]
    Static(Vec<LoxError>),

    /// Runtime errors.  Each aborted only the top-level statement that
    /// raised it.
    #[error("{}", Diagnostics(.0))]
    Runtime(Vec<LoxError>),
}

impl RunError {
    /// Every individual error carried by this outcome.
    pub fn errors(&self) -> Vec<&LoxError> {
        match self {
            RunError::Static(errors) | RunError::Runtime(errors) => errors.iter().collect(),
        }
    }
}

struct Diagnostics<'a>(&'a [LoxError]);

impl fmt::Display for Diagnostics<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// A persistent interpreter session.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }

    /// A session whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    /// Run `source` (a whole file or one prompt line) through every stage.
    pub fn run(&mut self, source: &str) -> Result<(), RunError> {
        info!("Running {} byte(s) of source", source.len());

        let (tokens, mut errors) = scan_tokens(source);

        // The parser runs even after lexical errors so that syntax errors in
        // the same text are reported in the same pass.
        let statements = match Parser::new(tokens).parse() {
            Ok(statements) => statements,
            Err(parse_errors) => {
                errors.extend(parse_errors);
                return Err(RunError::Static(errors));
            }
        };

        if !errors.is_empty() {
            return Err(RunError::Static(errors));
        }

        debug!("Parsed statements: {:?}", statements);

        Resolver::new(&mut self.interpreter)
            .resolve(&statements)
            .map_err(RunError::Static)?;

        self.interpreter
            .interpret(&statements)
            .map_err(RunError::Runtime)
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
