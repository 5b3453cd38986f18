use thiserror::Error;

use crate::{
    expr::Expr,
    lexer::{Token, TokenKind},
};

/// Recursive-descent parser over the token stream.
///
/// ```text
/// expr        := lambda | let | application
/// let         := "let" VAR "=" expr "in" expr
/// lambda      := "\" VAR "." expr
/// application := atom { atom }
/// atom        := VAR | "(" expr ")"
/// ```
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
}

/// Errors that stop parsing. Line and column are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{line}:{column} expected {expected}, found \"{found}\"")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("{line}:{column} expected {expected}, found end of input")]
    UnexpectedEnd {
        expected: String,
        line: usize,
        column: usize,
    },
    #[error("{line}:{column} expected end of input, found \"{found}\"")]
    TrailingInput {
        found: String,
        line: usize,
        column: usize,
    },
}

impl ParseError {
    /// Position of the offending token as `(line, column)`.
    #[must_use]
    pub const fn position(&self) -> (usize, usize) {
        match self {
            Self::UnexpectedToken { line, column, .. }
            | Self::UnexpectedEnd { line, column, .. }
            | Self::TrailingInput { line, column, .. } => (*line, *column),
        }
    }
}

impl Parser {
    #[must_use]
    pub const fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, current: 0 }
    }

    /// Parses the whole token stream as a single expression.
    ///
    /// # Errors
    /// Returns a `ParseError` at the first unexpected or missing token, or if
    /// tokens remain after a complete expression.
    ///
    /// # Examples
    /// ```
    /// use lamb::{lexer::Lexer, parser::Parser};
    ///
    /// let tokens = Lexer::new("let id = \\x.x in id").tokenize().unwrap();
    /// let expr = Parser::new(tokens).parse().unwrap();
    /// assert_eq!(expr.to_string(), "((λid.id) (λx.x))");
    /// ```
    pub fn parse(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expression()?;
        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingInput {
                found: token.text.clone(),
                line: token.line,
                column: token.column,
            });
        }
        Ok(expr)
    }

    fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::Lambda) => self.parse_abstraction(),
            Some(TokenKind::Let) => self.parse_let(),
            _ => self.parse_application(),
        }
    }

    fn parse_abstraction(&mut self) -> Result<Expr, ParseError> {
        self.advance(); // consume '\'
        let param = self.expect(TokenKind::Var, "a variable")?;
        self.expect(TokenKind::Dot, "\".\"")?;
        let body = self.parse_expression()?;
        Ok(Expr::Abs(param.text, Box::new(body)))
    }

    /// `let x = value in body` desugars to `(\x.body) value`.
    fn parse_let(&mut self) -> Result<Expr, ParseError> {
        self.advance(); // consume 'let'
        let name = self.expect(TokenKind::Var, "a variable for the let binding")?;
        self.expect(TokenKind::Eq, "\"=\"")?;
        let value = self.parse_expression()?;
        self.expect(TokenKind::In, "\"in\"")?;
        let body = self.parse_expression()?;
        Ok(Expr::App(
            Box::new(Expr::Abs(name.text, Box::new(body))),
            Box::new(value),
        ))
    }

    fn parse_application(&mut self) -> Result<Expr, ParseError> {
        // Parse left-associative application: f g h = ((f g) h)
        let mut expr = self.parse_atom()?;

        while matches!(
            self.peek_kind(),
            Some(TokenKind::Var | TokenKind::LeftParen)
        ) {
            let arg = self.parse_atom()?;
            expr = Expr::App(Box::new(expr), Box::new(arg));
        }

        Ok(expr)
    }

    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        if self.peek_kind() == Some(TokenKind::LeftParen) {
            self.advance(); // consume '('
            let expr = self.parse_expression()?;
            self.expect(TokenKind::RightParen, "\")\"")?;
            return Ok(expr);
        }

        let name = self.expect(TokenKind::Var, "a variable")?;
        Ok(Expr::Var(name.text))
    }

    /// Consumes the next token if it has the given kind.
    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                let token = token.clone();
                self.advance();
                Ok(token)
            }
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.text.clone(),
                line: token.line,
                column: token.column,
            }),
            None => {
                // Report at the last token, or at the very start of empty input
                let (line, column) = self.tokens.last().map_or((1, 1), |t| (t.line, t.column));
                Err(ParseError::UnexpectedEnd {
                    expected: expected.to_string(),
                    line,
                    column,
                })
            }
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.current)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) {
        if self.current < self.tokens.len() {
            self.current += 1;
        }
    }
}
