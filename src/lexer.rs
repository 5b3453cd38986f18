use thiserror::Error;

/// Symbol characters that may appear in a variable name besides ASCII letters
/// and digits. `=` always stands alone and `#` is reserved for directives.
const SYMBOLS: &str = "!@$%^&*_+{}[]:;\"'<>?,/|~`-";

const KEYWORDS: [(&str, TokenKind); 2] = [("let", TokenKind::Let), ("in", TokenKind::In)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// \
    Lambda,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// .
    Dot,
    /// Variable names
    Var,
    /// `let` keyword
    Let,
    /// `in` keyword
    In,
    /// =
    Eq,
}

/// A token together with the 1-based line and column of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            column,
        }
    }
}

/// Scanning stopped at a character that cannot start any token.
///
/// `scanned` holds every token recognized before the offending character.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{line}:{column} unexpected character {ch:?}")]
pub struct LexError {
    pub ch: char,
    pub line: usize,
    pub column: usize,
    pub scanned: Vec<Token>,
}

pub struct Lexer<'input> {
    input: &'input str,
    pos: usize,
    line: usize,
    column: usize,
}

impl<'input> Lexer<'input> {
    #[must_use]
    pub const fn new(input: &'input str) -> Self {
        Lexer {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenizes the input string into a vector of tokens.
    ///
    /// Spaces, newlines and `//` comments separate tokens and are not emitted.
    ///
    /// # Errors
    /// Returns a [`LexError`] at the first character that is neither
    /// whitespace, punctuation, nor part of a variable name.
    ///
    /// # Examples
    /// ```
    /// use lamb::lexer::{Lexer, TokenKind};
    ///
    /// let tokens = Lexer::new("\\x.x").tokenize().unwrap();
    /// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
    /// assert_eq!(kinds, [TokenKind::Lambda, TokenKind::Var, TokenKind::Dot, TokenKind::Var]);
    /// ```
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.current_char() {
            match ch {
                ' ' | '\n' => self.advance(),
                '\\' => tokens.push(self.read_single(TokenKind::Lambda)),
                '=' => tokens.push(self.read_single(TokenKind::Eq)),
                '(' => tokens.push(self.read_single(TokenKind::LeftParen)),
                ')' => tokens.push(self.read_single(TokenKind::RightParen)),
                '.' => tokens.push(self.read_single(TokenKind::Dot)),
                _ if self.rest().starts_with("//") => self.skip_comment(),
                _ => {
                    if let Some(keyword) = self.read_keyword() {
                        tokens.push(keyword);
                    } else if is_name_char(ch) {
                        tokens.push(self.read_name());
                    } else {
                        return Err(LexError {
                            ch,
                            line: self.line,
                            column: self.column,
                            scanned: tokens,
                        });
                    }
                }
            }
        }

        Ok(tokens)
    }

    fn rest(&self) -> &'input str {
        &self.input[self.pos..]
    }

    fn current_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn read_single(&mut self, kind: TokenKind) -> Token {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        self.advance();
        Token::new(kind, &self.input[start..self.pos], line, column)
    }

    /// Reads `let` or `in`, but only when followed by a space, a newline or the
    /// end of input.
    fn read_keyword(&mut self) -> Option<Token> {
        let rest = self.rest();
        let (word, kind) = KEYWORDS.into_iter().find(|(word, _)| {
            rest.strip_prefix(*word)
                .is_some_and(|after| matches!(after.chars().next(), None | Some(' ' | '\n')))
        })?;

        let (line, column) = (self.line, self.column);
        for _ in 0..word.len() {
            self.advance();
        }
        Some(Token::new(kind, word, line, column))
    }

    fn read_name(&mut self) -> Token {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        while self.current_char().is_some_and(is_name_char) {
            self.advance();
        }
        Token::new(TokenKind::Var, &self.input[start..self.pos], line, column)
    }

    /// Skips to the end of the line; the newline itself is left in place.
    fn skip_comment(&mut self) {
        while self.current_char().is_some_and(|ch| ch != '\n') {
            self.advance();
        }
    }
}

fn is_name_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || SYMBOLS.contains(ch)
}
