//! Error handling types and utilities for the sam toolchain.
//!
//! Every pipeline stage reports failures through the single [`Error`] type
//! defined here. An error always carries the [`ErrorKind`] of the stage that
//! produced it, a human-readable message and, for lexical and syntax errors,
//! the 1-based source position of the offending token.
//!
//! # Error Philosophy
//!
//! - **Fail fast**: each stage stops at its first error; nothing is accumulated
//!   or recovered.
//! - **One kind per stage**: the lexer only raises [`ErrorKind::Lex`], the parser
//!   only [`ErrorKind::Parse`], and so on. Callers decide what to do with it.
//! - **Precise location**: lex and parse errors point at a line and column.
//!
//! # Examples
//!
//! ```rust
//! use sam_syntax::error::{Error, ErrorKind, Result, semantic_error};
//!
//! let located = Error::parse("Expected ';'", 3, 14);
//! assert_eq!(located.kind, ErrorKind::Parse);
//! assert_eq!(located.to_string(), "Expected ';' at 3:14");
//!
//! fn check(depth: usize) -> Result<()> {
//!     if depth == 0 {
//!         semantic_error("'break' outside of loop")
//!     } else {
//!         Ok(())
//!     }
//! }
//! assert!(check(0).is_err());
//! ```

use thiserror::Error as ThisError;

/// The pipeline stage an [`Error`] originates from.
///
/// The `Display` form is the label the driver prints in front of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum ErrorKind {
    /// Unrecognized character, malformed number, unterminated literal.
    #[error("Lex error")]
    Lex,
    /// Unexpected or missing token.
    #[error("Parse error")]
    Parse,
    /// Type mismatch, undeclared variable, illegal redeclaration,
    /// non-boolean condition, `break` outside a loop.
    #[error("Semantic error")]
    Semantic,
    /// Stack underflow, unresolved label, integer division by zero.
    #[error("Runtime error")]
    Runtime,
}

/// An error produced by one of the pipeline stages.
///
/// # Fields
///
/// - `kind`: which stage failed
/// - `msg`: human-readable error description
/// - `line`: optional 1-based line number in the source
/// - `col`: optional 1-based column number in the source
///
/// # Examples
///
/// ```rust
/// use sam_syntax::Error;
///
/// let err = Error::lex("Unexpected character '#'", 2, 7);
/// println!("{}: {}", err.kind, err); // "Lex error: Unexpected character '#' at 2:7"
///
/// let err = Error::runtime("division by zero");
/// assert_eq!(err.to_string(), "division by zero");
/// ```
#[derive(Debug, Clone, PartialEq, ThisError)]
#[error("{}", render(.msg, .line, .col))]
pub struct Error {
    /// Stage that raised the error
    pub kind: ErrorKind,

    /// Human-readable error message
    pub msg: String,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

fn render(msg: &str, line: &Option<usize>, col: &Option<usize>) -> String {
    match (line, col) {
        (Some(l), Some(c)) => format!("{} at {}:{}", msg, l, c),
        _ => msg.to_string(),
    }
}

impl Error {
    /// Creates an error of the given kind without source location.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: None,
            col: None,
        }
    }

    /// Creates an error of the given kind pointing at `line:col`.
    pub fn with_span(kind: ErrorKind, msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            msg: msg.into(),
            line: Some(line),
            col: Some(col),
        }
    }

    /// A lexical error at `line:col`.
    pub fn lex(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self::with_span(ErrorKind::Lex, msg, line, col)
    }

    /// A syntax error at `line:col`.
    pub fn parse(msg: impl Into<String>, line: usize, col: usize) -> Self {
        Self::with_span(ErrorKind::Parse, msg, line, col)
    }

    /// A static semantic error. The AST carries no positions, so these are
    /// never located.
    pub fn semantic(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Semantic, msg)
    }

    /// An execution error raised by the virtual machine.
    pub fn runtime(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, msg)
    }
}

/// A specialized `Result` type for sam operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::lex(msg, line, col))`.
pub fn lex_error<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::lex(msg, line, col))
}

/// Shorthand for `Err(Error::parse(msg, line, col))`.
pub fn parse_error<T>(line: usize, col: usize, msg: impl Into<String>) -> Result<T> {
    Err(Error::parse(msg, line, col))
}

/// Shorthand for `Err(Error::semantic(msg))`.
pub fn semantic_error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::semantic(msg))
}

/// Shorthand for `Err(Error::runtime(msg))`.
///
/// ```rust
/// use sam_syntax::error::{Result, runtime_error};
///
/// fn pop(stack: &mut Vec<i64>) -> Result<i64> {
///     match stack.pop() {
///         Some(v) => Ok(v),
///         None => runtime_error("stack underflow"),
///     }
/// }
/// assert!(pop(&mut Vec::new()).is_err());
/// ```
pub fn runtime_error<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::runtime(msg))
}
