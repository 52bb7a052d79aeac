//! Shared test helpers for the Rox test suite.
//!
//! Provides a capturing output sink and canonical run helpers so test files
//! don't need to copy-paste their own variants.
#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;
use std::thread;

use rox::ast::{Expr, Stmt};
use rox::error::LoxError;
use rox::parser::Parser;
use rox::runner::{Lox, RunError};
use rox::scanner::scan_tokens;

/// A `Write` sink whose contents stay readable after it is handed to the
/// interpreter.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// A session printing into a fresh buffer.
pub fn session() -> (Lox, SharedBuffer) {
    let buffer = SharedBuffer::default();
    let lox = Lox::with_output(Box::new(buffer.clone()));
    (lox, buffer)
}

/// Run `source` through the full pipeline.  Returns everything printed and
/// the outcome.
pub fn run(source: &str) -> (String, Result<(), RunError>) {
    let (mut lox, buffer) = session();
    let result = lox.run(source);
    (buffer.contents(), result)
}

/// Run `source`, panicking on any error, and return its output.
pub fn run_ok(source: &str) -> String {
    let (output, result) = run(source);
    if let Err(e) = result {
        panic!("program failed:\n{}\noutput so far:\n{}", e, output);
    }
    output
}

/// Run `source` expecting static errors, returning their messages.
pub fn static_errors(source: &str) -> Vec<String> {
    match run(source).1 {
        Err(RunError::Static(errors)) => errors.iter().map(LoxError::message).collect(),
        other => panic!("expected static errors, got {:?}", other),
    }
}

/// Run `source` expecting runtime errors, returning everything printed and
/// the errors.
pub fn runtime_errors(source: &str) -> (String, Vec<LoxError>) {
    match run(source) {
        (output, Err(RunError::Runtime(errors))) => (output, errors),
        (_, other) => panic!("expected a runtime error, got {:?}", other),
    }
}

/// Run `source` expecting exactly one runtime error.
pub fn runtime_error(source: &str) -> (String, LoxError) {
    let (output, mut errors) = runtime_errors(source);
    assert_eq!(errors.len(), 1, "expected one runtime error, got {:?}", errors);
    (output, errors.remove(0))
}

/// Lex and parse a whole program.
pub fn parse_program(source: &str) -> Result<Vec<Stmt>, Vec<LoxError>> {
    let (tokens, errors) = scan_tokens(source);
    assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
    Parser::new(tokens).parse()
}

/// Lex and parse a single expression.
pub fn parse_expr(source: &str) -> Expr {
    let (tokens, errors) = scan_tokens(source);
    assert!(errors.is_empty(), "unexpected lex errors: {:?}", errors);
    match Parser::new(tokens).parse_expression() {
        Ok(expr) => expr,
        Err(e) => panic!("failed to parse {:?}: {}", source, e),
    }
}

/// Run `f` on a thread with a stack large enough to reach the interpreter's
/// call-depth limit in an unoptimised build.
pub fn on_large_stack<T, F>(f: F) -> T
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let handle = thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(f)
        .expect("spawn test thread");

    match handle.join() {
        Ok(value) => value,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
