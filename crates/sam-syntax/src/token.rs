//! Token definitions for the sam language.
//!
//! Tokens are the smallest meaningful units of sam source code. The lexer
//! produces them in source order, ending with a single [`TokenKind::Eof`].
//!
//! # Token Categories
//!
//! - **Identifiers**: variable names (`x`, `total_sum`)
//! - **Literals**: integers, floats and strings (`42`, `3.5`, `"hi"`)
//! - **Keywords**: reserved words (`let`, `while`, `print`, `int`, ...)
//! - **Operators**: arithmetic, relational and logical (`+`, `<=`, `&&`)
//! - **Punctuation**: `(`, `)`, `{`, `}`, `:`, `;`
//! - **Special**: end-of-input marker
//!
//! # Examples
//!
//! ```rust
//! use sam_syntax::{Token, TokenKind};
//!
//! let tok = Token::new(TokenKind::Int(42), "42", 1, 15);
//! assert_eq!(tok.to_string(), "'42' at 1:15");
//! ```

use std::fmt;

/// Token types that can be produced by the sam lexer.
///
/// Literal and identifier variants carry their decoded content; all other
/// variants are plain markers. The exact source text of every token is kept
/// separately in [`Token::lexeme`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier: `foo`, `my_variable`
    Ident(String),

    /// An integer literal: `0`, `42`
    Int(i64),

    /// A float literal, any digit run with exactly one `.`: `3.5`, `1.`
    Float(f64),

    /// A string literal. Lexed so malformed strings are reported, but no
    /// grammar rule accepts it.
    Str(String),

    // === Keywords ===
    Let,
    While,
    If,
    Else,
    Break,
    Print,
    True,
    False,

    /// The `int` type keyword
    IntType,

    /// The `float` type keyword
    FloatType,

    /// The `bool` type keyword
    BoolType,

    // === Punctuation ===
    LParen,
    RParen,
    LBrace,
    RBrace,
    Colon,
    Semicolon,

    // === Operators ===
    /// Assignment `=`
    Equal,
    Plus,
    Minus,
    Star,
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    /// End-of-input marker, always the last token
    Eof,
}

impl TokenKind {
    /// Maps a scanned word onto its keyword, if it is reserved.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "let" => TokenKind::Let,
            "while" => TokenKind::While,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "break" => TokenKind::Break,
            "print" => TokenKind::Print,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "int" => TokenKind::IntType,
            "float" => TokenKind::FloatType,
            "bool" => TokenKind::BoolType,
            _ => return None,
        };
        Some(kind)
    }

    /// Short description used in parser diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Int(_) => "integer literal",
            TokenKind::Float(_) => "float literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Eof => "end of input",
            TokenKind::IntType | TokenKind::FloatType | TokenKind::BoolType => "type",
            _ => "token",
        }
    }
}

/// A token with its source text and position.
///
/// # Fields
///
/// - `kind`: the type and decoded content of the token
/// - `lexeme`: the exact source text the token was scanned from
/// - `line`: 1-based line number
/// - `col`: 1-based column number of the first character
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The type and semantic content of this token
    pub kind: TokenKind,

    /// Source text of this token (empty for `Eof`)
    pub lexeme: String,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind == TokenKind::Eof {
            write!(f, "end of input at {}:{}", self.line, self.col)
        } else {
            write!(f, "'{}' at {}:{}", self.lexeme, self.line, self.col)
        }
    }
}
