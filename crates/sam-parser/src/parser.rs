//! Recursive-descent parser producing the sam AST.
//!
//! Every decision is made from the current token alone. Binary precedence
//! levels are parsed by [`Parser::fold_binary`], which folds left while the
//! current token belongs to that level's operator set.
//!
//! Nesting is capped at [`MAX_DEPTH`]: every block, parenthesised
//! expression, unary operator and folded binary operator counts one level.
//! Later passes walk the AST recursively, so the cap bounds them as well.

use sam_syntax::ast::*;
use sam_syntax::error::{parse_error, Result};
use sam_syntax::token::{Token, TokenKind};
use tracing::debug;

type Level = fn(&mut Parser) -> Result<Expr>;

/// Deepest nesting the parser accepts before reporting a Parse error.
pub const MAX_DEPTH: usize = 256;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Create a parser over a token stream. A missing trailing `Eof` is
    /// supplied so lookahead never runs off the end.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, col) = tokens
                .last()
                .map(|t| (t.line, t.col + t.lexeme.chars().count()))
                .unwrap_or((1, 1));
            tokens.push(Token::new(TokenKind::Eof, "", line, col));
        }
        Self { tokens, pos: 0, depth: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn at_end(&self) -> bool {
        self.at(&TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        if !self.at_end() {
            self.pos += 1;
        }
        tok
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn unexpected<T>(&self) -> Result<T> {
        let tok = self.peek();
        match &tok.kind {
            TokenKind::Eof => parse_error(tok.line, tok.col, "Unexpected end of input"),
            _ => parse_error(tok.line, tok.col, format!("Unexpected token '{}'", tok.lexeme)),
        }
    }

    /// Error at the current token: `"<msg>, found <token>"`.
    fn mismatch<T>(&self, msg: &str) -> Result<T> {
        let tok = self.peek();
        let found = match &tok.kind {
            TokenKind::Eof => "end of input".to_string(),
            other => format!("{} '{}'", other.describe(), tok.lexeme),
        };
        parse_error(tok.line, tok.col, format!("{}, found {}", msg, found))
    }

    fn expect(&mut self, kind: TokenKind, msg: &str) -> Result<Token> {
        if self.at(&kind) {
            return Ok(self.advance());
        }
        self.mismatch(msg)
    }

    fn expect_ident(&mut self, msg: &str) -> Result<String> {
        if let TokenKind::Ident(name) = &self.peek().kind {
            let name = name.clone();
            self.advance();
            return Ok(name);
        }
        self.mismatch(msg)
    }

    /// Enter one nesting level, failing at the current token past [`MAX_DEPTH`].
    fn descend(&mut self, what: &str) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            let tok = self.peek();
            return parse_error(tok.line, tok.col, format!("{} nested too deeply", what));
        }
        self.depth += 1;
        Ok(())
    }

    /// program := stmt_list EOF
    pub fn parse_program(&mut self) -> Result<Program> {
        let stmts = self.parse_stmt_list()?;
        if !self.at_end() {
            return self.unexpected();
        }
        debug!(statements = stmts.len(), "parsed program");
        Ok(Program { stmts })
    }

    /// Zero or more statements, up to end of input or a closing brace.
    fn parse_stmt_list(&mut self) -> Result<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.at_end() && !self.at(&TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    pub fn parse_stmt(&mut self) -> Result<Stmt> {
        match self.peek().kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::While => self.parse_while(),
            TokenKind::If => self.parse_if().map(Stmt::If),
            TokenKind::Break => {
                self.advance();
                self.expect(TokenKind::Semicolon, "Expected ';' after 'break'")?;
                Ok(Stmt::Break)
            }
            TokenKind::Print => {
                self.advance();
                self.expect(TokenKind::LParen, "Expected '(' after 'print'")?;
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "Expected ')' after print expression")?;
                self.expect(TokenKind::Semicolon, "Expected ';' after print statement")?;
                Ok(Stmt::Print(expr))
            }
            TokenKind::Ident(_) => self.parse_assign(),
            TokenKind::LBrace => self.parse_block().map(Stmt::Block),
            _ => self.unexpected(),
        }
    }

    fn parse_let(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::Let, "Expected 'let'")?;
        let name = self.expect_ident("Expected variable name after 'let'")?;
        self.expect(TokenKind::Colon, "Expected ':' after variable name")?;
        let ty = self.parse_type()?;
        self.expect(TokenKind::Equal, "Expected '=' after type")?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after variable declaration")?;
        Ok(Stmt::Let { name, ty, expr })
    }

    fn parse_type(&mut self) -> Result<Type> {
        let ty = match self.peek().kind {
            TokenKind::IntType => Type::Int,
            TokenKind::FloatType => Type::Float,
            TokenKind::BoolType => Type::Bool,
            _ => return self.mismatch("Expected type after ':' (int, float or bool)"),
        };
        self.advance();
        Ok(ty)
    }

    fn parse_assign(&mut self) -> Result<Stmt> {
        let name = self.expect_ident("Expected variable name")?;
        self.expect(TokenKind::Equal, "Expected '=' in assignment")?;
        let expr = self.parse_expr()?;
        self.expect(TokenKind::Semicolon, "Expected ';' after assignment")?;
        Ok(Stmt::Assign { name, expr })
    }

    fn parse_while(&mut self) -> Result<Stmt> {
        self.expect(TokenKind::While, "Expected 'while'")?;
        let cond = self.parse_condition("while")?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body })
    }

    /// '(' expr ')'
    fn parse_condition(&mut self, after: &str) -> Result<Expr> {
        self.expect(TokenKind::LParen, &format!("Expected '(' after '{}'", after))?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen, &format!("Expected ')' after {} condition", after))?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<IfStmt> {
        self.expect(TokenKind::If, "Expected 'if'")?;
        let cond = self.parse_condition("if")?;
        let then_body = self.parse_block()?;
        let mut else_ifs = Vec::new();
        let mut else_body = None;
        while self.eat(&TokenKind::Else) {
            if self.eat(&TokenKind::If) {
                let cond = self.parse_condition("else if")?;
                let body = self.parse_block()?;
                else_ifs.push(ElseIf { cond, body });
            } else {
                // a bare else ends the chain
                else_body = Some(self.parse_block()?);
                break;
            }
        }
        Ok(IfStmt { cond, then_body, else_ifs, else_body })
    }

    fn parse_block(&mut self) -> Result<Vec<Stmt>> {
        self.expect(TokenKind::LBrace, "Expected '{' before block")?;
        self.descend("Blocks")?;
        let stmts = self.parse_stmt_list()?;
        self.expect(TokenKind::RBrace, "Expected '}' after block")?;
        self.depth -= 1;
        Ok(stmts)
    }

    /// Parse a single expression (lowest precedence: logical or).
    pub fn parse_expr(&mut self) -> Result<Expr> {
        self.parse_or()
    }

    fn fold_binary(&mut self, next: Level, op_of: fn(&TokenKind) -> Option<BinOp>) -> Result<Expr> {
        let mut lhs = next(self)?;
        let mut folds = 0;
        while let Some(op) = op_of(&self.peek().kind) {
            // each fold puts the left operand one level deeper
            self.descend("Expression")?;
            folds += 1;
            self.advance();
            let rhs = next(self)?;
            lhs = Expr::binary(op, lhs, rhs);
        }
        self.depth -= folds;
        Ok(lhs)
    }

    fn parse_or(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_and, |k| match k {
            TokenKind::OrOr => Some(BinOp::Or),
            _ => None,
        })
    }

    fn parse_and(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_equality, |k| match k {
            TokenKind::AndAnd => Some(BinOp::And),
            _ => None,
        })
    }

    fn parse_equality(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_relational, |k| match k {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::NotEq => Some(BinOp::Ne),
            _ => None,
        })
    }

    fn parse_relational(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_additive, |k| match k {
            TokenKind::Less => Some(BinOp::Lt),
            TokenKind::Greater => Some(BinOp::Gt),
            TokenKind::LessEq => Some(BinOp::Le),
            TokenKind::GreaterEq => Some(BinOp::Ge),
            _ => None,
        })
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_multiplicative, |k| match k {
            TokenKind::Plus => Some(BinOp::Add),
            TokenKind::Minus => Some(BinOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        self.fold_binary(Parser::parse_unary, |k| match k {
            TokenKind::Star => Some(BinOp::Mul),
            TokenKind::Slash => Some(BinOp::Div),
            _ => None,
        })
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.peek().kind {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Bang => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.descend("Expression")?;
        self.advance();
        let operand = self.parse_unary()?;
        self.depth -= 1;
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let tok = self.peek().clone();
        let expr = match tok.kind {
            TokenKind::Int(n) => Expr::Literal(Literal::Int(n)),
            TokenKind::Float(x) => Expr::Literal(Literal::Float(x)),
            TokenKind::True => Expr::Literal(Literal::Bool(true)),
            TokenKind::False => Expr::Literal(Literal::Bool(false)),
            TokenKind::Ident(name) => Expr::Ident(name),
            TokenKind::LParen => {
                self.descend("Expression")?;
                self.advance();
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen, "Expected ')' after expression")?;
                self.depth -= 1;
                return Ok(inner);
            }
            TokenKind::Str(_) => {
                let msg = "String literals are not supported as values";
                return parse_error(tok.line, tok.col, msg);
            }
            _ => return self.unexpected(),
        };
        self.advance();
        Ok(expr)
    }
}

/// Parse a whole token stream into a [`Program`].
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse_program()
}
