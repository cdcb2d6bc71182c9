//! sam lexer: converts source text into tokens.
use sam_syntax::error::{lex_error, Error, Result};
use sam_syntax::token::{Token, TokenKind};
use tracing::debug;

/// Tokenize `input` in one call.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    Lexer::new(input).tokenize()
}

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    fn lexeme_from(&self, start: usize) -> String {
        self.src[start..self.pos].iter().collect()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '/' && self.peek_next() == Some('/') {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> Result<TokenKind> {
        let (start_line, start_col) = (self.line, self.col);
        let mut s = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else if c == '.' {
                if seen_dot {
                    return lex_error(self.line, self.col, "Invalid number: more than one '.'");
                }
                seen_dot = true;
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if seen_dot {
            let val: f64 = s
                .parse()
                .map_err(|_| Error::lex(format!("Invalid number '{}'", s), start_line, start_col))?;
            Ok(TokenKind::Float(val))
        } else {
            let val: i64 = s.parse().map_err(|_| {
                Error::lex(format!("Invalid number '{}' (out of range)", s), start_line, start_col)
            })?;
            Ok(TokenKind::Int(val))
        }
    }

    fn read_ident_or_keyword(&mut self) -> TokenKind {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::keyword(&s).unwrap_or(TokenKind::Ident(s))
    }

    /// Called with the opening quote already consumed.
    fn read_string(&mut self, start_line: usize, start_col: usize) -> Result<TokenKind> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            match c {
                '"' => {
                    self.advance();
                    return Ok(TokenKind::Str(s));
                }
                '\n' => break,
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some('n') => s.push('\n'),
                        Some('t') => s.push('\t'),
                        Some(other) => s.push(other),
                        None => break,
                    }
                }
                other => {
                    s.push(other);
                    self.advance();
                }
            }
        }
        lex_error(start_line, start_col, "Unterminated string")
    }

    /// Consume one char and, if the next one is `second`, that one too.
    fn one_or_two(&mut self, second: char, one: TokenKind, two: TokenKind) -> TokenKind {
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            two
        } else {
            one
        }
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let start = self.pos;
            let line = self.line;
            let col = self.col;
            let kind = match self.peek() {
                None => {
                    tokens.push(Token::new(TokenKind::Eof, "", line, col));
                    break;
                }
                Some(c) => match c {
                    '(' | ')' | '{' | '}' | ':' | ';' | '+' | '-' | '*' | '/' => {
                        self.advance();
                        match c {
                            '(' => TokenKind::LParen,
                            ')' => TokenKind::RParen,
                            '{' => TokenKind::LBrace,
                            '}' => TokenKind::RBrace,
                            ':' => TokenKind::Colon,
                            ';' => TokenKind::Semicolon,
                            '+' => TokenKind::Plus,
                            '-' => TokenKind::Minus,
                            '*' => TokenKind::Star,
                            _ => TokenKind::Slash,
                        }
                    }
                    '=' => self.one_or_two('=', TokenKind::Equal, TokenKind::EqEq),
                    '!' => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),
                    '<' => self.one_or_two('=', TokenKind::Less, TokenKind::LessEq),
                    '>' => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEq),
                    '&' => {
                        if self.peek_next() != Some('&') {
                            return lex_error(line, col, "Unexpected '&' (did you mean '&&'?)");
                        }
                        self.advance();
                        self.advance();
                        TokenKind::AndAnd
                    }
                    '|' => {
                        if self.peek_next() != Some('|') {
                            return lex_error(line, col, "Unexpected '|' (did you mean '||'?)");
                        }
                        self.advance();
                        self.advance();
                        TokenKind::OrOr
                    }
                    '"' => {
                        self.advance();
                        self.read_string(line, col)?
                    }
                    c if c.is_ascii_digit() => self.read_number()?,
                    c if c.is_ascii_alphabetic() || c == '_' => self.read_ident_or_keyword(),
                    other => {
                        return lex_error(line, col, format!("Unexpected character '{}'", other));
                    }
                },
            };
            tokens.push(Token::new(kind, self.lexeme_from(start), line, col));
        }
        debug!(tokens = tokens.len(), lines = self.line, "tokenized source");
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sam_syntax::error::ErrorKind;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .expect("Lexing should succeed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_declaration_tokens() {
        assert_eq!(
            kinds("let x: int = 5;"),
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Colon,
                TokenKind::IntType,
                TokenKind::Equal,
                TokenKind::Int(5),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_are_reclassified() {
        assert_eq!(
            kinds("while if else break print true false float bool letter"),
            vec![
                TokenKind::While,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::Break,
                TokenKind::Print,
                TokenKind::True,
                TokenKind::False,
                TokenKind::FloatType,
                TokenKind::BoolType,
                TokenKind::Ident("letter".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_two_char_operators_are_greedy() {
        assert_eq!(
            kinds("== != <= >= && || = ! < >"),
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Equal,
                TokenKind::Bang,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("a<=b")[1], TokenKind::LessEq);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("42")[0], TokenKind::Int(42));
        assert_eq!(kinds("3.5")[0], TokenKind::Float(3.5));
        assert_eq!(kinds("7.")[0], TokenKind::Float(7.0));
    }

    #[test]
    fn test_second_dot_is_an_error() {
        let err = tokenize("let f: float = 1.2.3;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert!(err.msg.contains("Invalid number"));
        assert_eq!(err.line, Some(1));
        assert_eq!(err.col, Some(19));
    }

    #[test]
    fn test_integer_overflow_is_an_error() {
        let err = tokenize("99999999999999999999").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
    }

    #[test]
    fn test_comments_and_positions() {
        let tokens = tokenize("// header\nprint(x); // trailing\n  y").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Print);
        assert_eq!((tokens[0].line, tokens[0].col), (2, 1));
        assert_eq!(tokens[2].lexeme, "x");
        assert_eq!((tokens[2].line, tokens[2].col), (2, 7));
        let y = &tokens[5];
        assert_eq!(y.kind, TokenKind::Ident("y".to_string()));
        assert_eq!((y.line, y.col), (3, 3));
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(
            kinds("7 / 2"),
            vec![TokenKind::Int(7), TokenKind::Slash, TokenKind::Int(2), TokenKind::Eof]
        );
    }

    #[test]
    fn test_lexemes_keep_source_text() {
        let tokens = tokenize("x >= 10.25").unwrap();
        let lexemes: Vec<&str> = tokens.iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(lexemes, vec!["x", ">=", "10.25", ""]);
    }

    #[test]
    fn test_strings() {
        assert_eq!(kinds("\"hi\"")[0], TokenKind::Str("hi".to_string()));
        let err = tokenize("\"never closed").unwrap_err();
        assert!(err.msg.contains("Unterminated string"));
        assert_eq!((err.line, err.col), (Some(1), Some(1)));
        assert!(tokenize("\"split\nline\"").is_err());
    }

    #[test]
    fn test_unexpected_characters() {
        let err = tokenize("let x: int = 5 # 3;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Lex);
        assert!(err.msg.contains("'#'"));
        assert_eq!((err.line, err.col), (Some(1), Some(16)));
        assert!(tokenize("a & b").is_err());
        assert!(tokenize("a | b").is_err());
    }

    #[test]
    fn test_empty_input_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   // nothing\n"), vec![TokenKind::Eof]);
    }

    #[test]
    fn test_tokenizing_is_deterministic() {
        let src = "let x: int = 0; while (x < 3) { print(x); x = x + 1; }";
        assert_eq!(tokenize(src).unwrap(), tokenize(src).unwrap());
    }
}
