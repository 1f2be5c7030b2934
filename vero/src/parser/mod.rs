//! Recursive-descent parser
//!
//! Precedence, lowest first: statements, statement, expr (`let` or `or`),
//! `and`, `not`, comparison, `+ -`, `* / %`, unary `+ -`, `^` (right
//! associative), call, atom.
//!
//! Two places backtrack: the statement after a terminator inside a statement
//! sequence, and the optional value after `return`. Both save the cursor,
//! attempt the parse and restore the cursor on failure.

use crate::ast::{BinOp, IfCase, Node, NodeKind, Span, UnaryOp};
use crate::error::{Result, VeroError};
use crate::lexer::{Token, TokenKind};
use std::rc::Rc;


const STATEMENT_EXPECTED: &str = "Expected 'let', 'if', 'for', 'while', 'func', 'return', 'continue', 'break', INT, FLOAT, IDENTIFIER, '+', '-', '[', '(', 'not' or 'print'";
const EXPR_EXPECTED: &str =
    "Expected 'let', INT, FLOAT, IDENTIFIER, 'if', 'for', 'while', 'func', '+', '-', '[' or '('";
const NOT_EXPECTED: &str = "Expected 'not', INT, FLOAT, IDENTIFIER, '+', '-', '[' or '('";
const ATOM_EXPECTED: &str =
    "Expected INT, FLOAT, IDENTIFIER, 'if', 'for', 'while', 'func', '+', '-', '(' or '['";
const ARG_EXPECTED: &str = "Expected ')', 'let', 'if', 'for', 'while', 'func', INT, FLOAT, IDENTIFIER, '+', '-', '[' or '('";
const ELEMENT_EXPECTED: &str = "Expected ']', 'let', 'if', 'for', 'while', 'func', INT, FLOAT, IDENTIFIER, '+', '-', '[' or '('";
const TRAILING_EXPECTED: &str = "Expected '+', '-', '*', or '/'";

/// Parse a token stream into a statement block
pub fn parse(tokens: Vec<Token>) -> Result<Node> {
    Parser::new(tokens).parse_program()
}

/// Replace an error raised exactly at `start` with a broader expected-token message
fn generalize(err: VeroError, start: Span, message: &str) -> VeroError {
    match err {
        VeroError::InvalidSyntax { span, .. } if span.start.index == start.start.index => {
            VeroError::invalid_syntax(message, span)
        }
        other => other,
    }
}

fn comparison_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::EqEq => Some(BinOp::Eq),
        TokenKind::NotEq => Some(BinOp::Ne),
        TokenKind::Lt => Some(BinOp::Lt),
        TokenKind::Gt => Some(BinOp::Gt),
        TokenKind::LtEq => Some(BinOp::Le),
        TokenKind::GtEq => Some(BinOp::Ge),
        _ => None,
    }
}

fn arith_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Plus => Some(BinOp::Add),
        TokenKind::Minus => Some(BinOp::Sub),
        _ => None,
    }
}

fn term_op(kind: &TokenKind) -> Option<BinOp> {
    match kind {
        TokenKind::Star => Some(BinOp::Mul),
        TokenKind::Slash => Some(BinOp::Div),
        TokenKind::Percent => Some(BinOp::Mod),
        _ => None,
    }
}

fn and_op(kind: &TokenKind) -> Option<BinOp> {
    matches!(kind, TokenKind::And).then_some(BinOp::And)
}

fn or_op(kind: &TokenKind) -> Option<BinOp> {
    matches!(kind, TokenKind::Or).then_some(BinOp::Or)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Error of the last abandoned speculative parse and the token index it started at
    abandoned: Option<(usize, VeroError)>,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().is_none_or(|t| t.kind != TokenKind::Eof) {
            let span = tokens.last().map_or(Span::default(), |t| {
                Span::new(t.span.file, t.span.end, t.span.end)
            });
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            abandoned: None,
        }
    }

    // ====================================================================
    // Cursor
    // ====================================================================

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    /// Consume the current token; the cursor never moves past Eof
    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn skip_newlines(&mut self) -> usize {
        let mut count = 0;
        while self.at(&TokenKind::Newline) {
            self.advance();
            count += 1;
        }
        count
    }

    /// Syntax error at the current token
    ///
    /// If a speculative parse was abandoned at this very token after getting
    /// further, its error is the more useful one and is returned instead.
    fn error(&mut self, message: &str) -> VeroError {
        if self
            .abandoned
            .as_ref()
            .is_some_and(|(at, _)| *at == self.pos)
        {
            if let Some((_, err)) = self.abandoned.take() {
                return err;
            }
        }
        VeroError::invalid_syntax(message, self.peek().span)
    }

    fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.error(message))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.error("Expected Identifier")),
        }
    }

    /// Run `parse`; on failure rewind to where it started and yield `None`
    fn attempt<T>(&mut self, parse: fn(&mut Self) -> Result<T>) -> Option<T> {
        let checkpoint = self.pos;
        match parse(self) {
            Ok(node) => Some(node),
            Err(err) => {
                tracing::trace!(token = checkpoint, error = %err, "rewinding speculative parse");
                if err.span().start.index > self.tokens[checkpoint].span.start.index {
                    self.abandoned = Some((checkpoint, err));
                }
                self.pos = checkpoint;
                None
            }
        }
    }

    // ====================================================================
    // Statements
    // ====================================================================

    fn parse_program(&mut self) -> Result<Node> {
        self.skip_newlines();
        if self.at(&TokenKind::Eof) {
            return Ok(Node::new(NodeKind::Block(Vec::new()), self.peek().span));
        }
        self.pos = 0;

        let program = self.statements()?;
        if !self.at(&TokenKind::Eof) {
            return Err(self.error(TRAILING_EXPECTED));
        }
        Ok(program)
    }

    /// One or more statements separated by terminators
    fn statements(&mut self) -> Result<Node> {
        self.skip_newlines();

        let first = self.statement()?;
        let mut span = first.span;
        let mut statements = vec![first];

        while self.skip_newlines() > 0 {
            match self.attempt(Self::statement) {
                Some(statement) => {
                    span = span.merge(statement.span);
                    statements.push(statement);
                }
                None => break,
            }
        }

        Ok(Node::new(NodeKind::Block(statements), span))
    }

    fn statement(&mut self) -> Result<Node> {
        let start = self.peek().span;

        match self.peek().kind {
            TokenKind::Return => {
                self.advance();
                let value = self.attempt(Self::expr);
                let span = value.as_ref().map_or(start, |v| start.merge(v.span));
                Ok(Node::new(NodeKind::Return(value.map(Box::new)), span))
            }
            TokenKind::Continue => {
                self.advance();
                Ok(Node::new(NodeKind::Continue, start))
            }
            TokenKind::Break => {
                self.advance();
                Ok(Node::new(NodeKind::Break, start))
            }
            _ => self
                .expr()
                .map_err(|err| generalize(err, start, STATEMENT_EXPECTED)),
        }
    }

    // ====================================================================
    // Expressions
    // ====================================================================

    fn expr(&mut self) -> Result<Node> {
        let start = self.peek().span;

        if self.at(&TokenKind::Let) {
            self.advance();
            let name = self.expect_ident()?;
            self.expect(&TokenKind::Eq, "Expected '='")?;
            let value = self.expr()?;
            let span = start.merge(value.span);
            return Ok(Node::new(
                NodeKind::VarAssign {
                    name,
                    value: Box::new(value),
                },
                span,
            ));
        }

        self.binary(Self::and_expr, or_op)
            .map_err(|err| generalize(err, start, EXPR_EXPECTED))
    }

    /// Left-associative chain of `next` joined by operators `op_for` accepts
    fn binary(
        &mut self,
        next: fn(&mut Self) -> Result<Node>,
        op_for: fn(&TokenKind) -> Option<BinOp>,
    ) -> Result<Node> {
        let mut left = next(self)?;
        while let Some(op) = op_for(&self.peek().kind) {
            self.advance();
            let right = next(self)?;
            let span = left.span.merge(right.span);
            left = Node::new(
                NodeKind::BinOp {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Node> {
        self.binary(Self::not_expr, and_op)
    }

    fn not_expr(&mut self) -> Result<Node> {
        let start = self.peek().span;

        if self.at(&TokenKind::Not) {
            self.advance();
            let operand = self.not_expr()?;
            let span = start.merge(operand.span);
            return Ok(Node::new(
                NodeKind::UnaryOp {
                    op: UnaryOp::Not,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.binary(Self::arith_expr, comparison_op)
            .map_err(|err| generalize(err, start, NOT_EXPECTED))
    }

    fn arith_expr(&mut self) -> Result<Node> {
        self.binary(Self::term, arith_op)
    }

    fn term(&mut self) -> Result<Node> {
        self.binary(Self::unary, term_op)
    }

    fn unary(&mut self) -> Result<Node> {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.power(),
        };
        let start = self.advance().span;
        let operand = self.unary()?;
        let span = start.merge(operand.span);
        Ok(Node::new(
            NodeKind::UnaryOp {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `call ^ unary`; the right side recurses through unary, so `^` is right associative
    fn power(&mut self) -> Result<Node> {
        let base = self.call()?;
        if !self.at(&TokenKind::Caret) {
            return Ok(base);
        }
        self.advance();
        let exponent = self.unary()?;
        let span = base.span.merge(exponent.span);
        Ok(Node::new(
            NodeKind::BinOp {
                op: BinOp::Pow,
                left: Box::new(base),
                right: Box::new(exponent),
            },
            span,
        ))
    }

    fn call(&mut self) -> Result<Node> {
        let mut callee = self.atom()?;
        while self.at(&TokenKind::LParen) {
            self.advance();
            let (args, close) = self.call_args()?;
            let span = callee.span.merge(close);
            callee = Node::new(
                NodeKind::Call {
                    callee: Box::new(callee),
                    args,
                },
                span,
            );
        }
        Ok(callee)
    }

    /// Arguments after '(' up to and including ')'
    fn call_args(&mut self) -> Result<(Vec<Node>, Span)> {
        if self.at(&TokenKind::RParen) {
            return Ok((Vec::new(), self.advance().span));
        }

        let start = self.peek().span;
        let first = self
            .expr()
            .map_err(|err| generalize(err, start, ARG_EXPECTED))?;
        let mut args = vec![first];
        while self.at(&TokenKind::Comma) {
            self.advance();
            args.push(self.expr()?);
        }

        let close = self.expect(&TokenKind::RParen, "Expected ',' or ')'")?;
        Ok((args, close.span))
    }

    fn atom(&mut self) -> Result<Node> {
        let token = self.peek().clone();

        match token.kind {
            TokenKind::Int(n) => {
                self.advance();
                Ok(Node::new(NodeKind::Int(n), token.span))
            }
            TokenKind::Float(x) => {
                self.advance();
                Ok(Node::new(NodeKind::Float(x), token.span))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Node::new(NodeKind::Str(s), token.span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Ok(Node::new(NodeKind::VarAccess(name), token.span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.expr()?;
                self.expect(&TokenKind::RParen, "Expected ')'")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.list_expr(),
            TokenKind::If => self.if_expr(),
            TokenKind::For => self.for_expr(),
            TokenKind::While => self.while_expr(),
            TokenKind::Func => self.func_def(),
            TokenKind::Builtin(builtin) => {
                self.advance();
                self.expect(&TokenKind::LParen, "Expected '('")?;
                let (args, close) = self.call_args()?;
                let callee = Node::new(NodeKind::VarAccess(builtin.name().to_string()), token.span);
                Ok(Node::new(
                    NodeKind::Call {
                        callee: Box::new(callee),
                        args,
                    },
                    token.span.merge(close),
                ))
            }
            _ => Err(self.error(ATOM_EXPECTED)),
        }
    }

    fn list_expr(&mut self) -> Result<Node> {
        let open = self.advance().span;

        if self.at(&TokenKind::RBracket) {
            let close = self.advance().span;
            return Ok(Node::new(NodeKind::List(Vec::new()), open.merge(close)));
        }

        let start = self.peek().span;
        let first = self
            .expr()
            .map_err(|err| generalize(err, start, ELEMENT_EXPECTED))?;
        let mut elements = vec![first];
        while self.at(&TokenKind::Comma) {
            self.advance();
            elements.push(self.expr()?);
        }

        let close = self.expect(&TokenKind::RBracket, "Expected ',' or ']'")?;
        Ok(Node::new(NodeKind::List(elements), open.merge(close.span)))
    }

    // ====================================================================
    // Structured forms
    // ====================================================================

    /// Body after '{' through the closing '}'
    ///
    /// A terminator right after '{' selects block form (a statement
    /// sequence); anything else is inline form (exactly one statement).
    /// Returns the body, whether it was block form, and the '}' span.
    fn body(&mut self) -> Result<(Node, bool, Span)> {
        self.expect(&TokenKind::LBrace, "Expected '{'")?;

        let block_form = self.at(&TokenKind::Newline);
        let body = if block_form {
            self.statements()?
        } else {
            self.statement()?
        };

        let close = self.expect(&TokenKind::RBrace, "Expected '}'")?;
        Ok((body, block_form, close.span))
    }

    fn if_expr(&mut self) -> Result<Node> {
        let start = self.advance().span;
        let mut cases = Vec::new();
        let mut end = self.if_case(&mut cases)?;

        loop {
            match self.peek().kind {
                TokenKind::Elif => {
                    self.advance();
                    end = self.if_case(&mut cases)?;
                }
                TokenKind::Else => {
                    let else_span = self.advance().span;
                    let (body, block_form, close) = self.body()?;
                    cases.push(IfCase {
                        condition: Node::new(NodeKind::Int(1), else_span),
                        body,
                        returns_null: block_form,
                    });
                    end = close;
                    break;
                }
                _ => break,
            }
        }

        Ok(Node::new(NodeKind::If { cases }, start.merge(end)))
    }

    /// Condition and body of an `if` or `elif` arm; the keyword is already consumed
    fn if_case(&mut self, cases: &mut Vec<IfCase>) -> Result<Span> {
        let condition = self.expr()?;
        let (body, block_form, close) = self.body()?;
        cases.push(IfCase {
            condition,
            body,
            returns_null: block_form,
        });
        Ok(close)
    }

    fn for_expr(&mut self) -> Result<Node> {
        let start_span = self.advance().span;

        let var = self.expect_ident()?;
        self.expect(&TokenKind::Eq, "Expected '='")?;
        let start = self.expr()?;
        self.expect(&TokenKind::To, "Expected 'to'")?;
        let end = self.expr()?;

        let step = if self.at(&TokenKind::Step) {
            self.advance();
            Some(Box::new(self.expr()?))
        } else {
            None
        };

        let (body, block_form, close) = self.body()?;

        Ok(Node::new(
            NodeKind::For {
                var,
                start: Box::new(start),
                end: Box::new(end),
                step,
                body: Box::new(body),
                returns_null: block_form,
            },
            start_span.merge(close),
        ))
    }

    fn while_expr(&mut self) -> Result<Node> {
        let start = self.advance().span;
        let condition = self.expr()?;
        let (body, block_form, close) = self.body()?;

        Ok(Node::new(
            NodeKind::While {
                condition: Box::new(condition),
                body: Box::new(body),
                returns_null: block_form,
            },
            start.merge(close),
        ))
    }

    fn func_def(&mut self) -> Result<Node> {
        let start = self.advance().span;

        let name = match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                self.expect(&TokenKind::LParen, "Expected '('")?;
                Some(name)
            }
            _ => {
                self.expect(&TokenKind::LParen, "Expected IDENTIFIER or '('")?;
                None
            }
        };

        let mut params = Vec::new();
        if matches!(self.peek().kind, TokenKind::Ident(_)) {
            params.push(self.expect_ident()?);
            while self.at(&TokenKind::Comma) {
                self.advance();
                params.push(self.expect_ident()?);
            }
            self.expect(&TokenKind::RParen, "Expected ')' or ','")?;
        } else {
            self.expect(&TokenKind::RParen, "Expected IDENTIFIER or ')'")?;
        }

        let (body, block_form, close) = self.body()?;

        Ok(Node::new(
            NodeKind::FuncDef {
                name,
                params,
                body: Rc::new(body),
                auto_return: !block_form,
            },
            start.merge(close),
        ))
    }
}
