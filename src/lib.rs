pub mod engine;
pub mod expr;
pub mod lexer;
pub mod numeral;
pub mod parser;
pub mod runner;

use anyhow::Result;
// Re-export main types and functions for convenient use
pub use engine::{Reducer, Step, Steps, is_free_in};
pub use expr::{Expr, IntoExpr};
pub use lexer::{LexError, Lexer, Token, TokenKind};
pub use numeral::decode_numeral;
pub use parser::{ParseError, Parser};
pub use runner::{FsLoader, InputError, Loader, Outcome, Runner, preprocess};

// Macros are automatically exported at the crate root by #[macro_export]

/// Parse a lambda calculus expression from a string.
///
/// This is a convenience function that lexes and parses in one go. It does
/// not expand `#use` directives; use a [`Runner`] for that.
///
/// # Errors
/// Returns a [`LexError`] or [`ParseError`] if the input is malformed.
///
/// # Examples
/// ```
/// use lamb::{abs, app, parse};
///
/// assert_eq!(parse("\\x.x").unwrap(), abs!("x", "x"));
/// assert_eq!(parse("let x = a in f x").unwrap(), app!(abs!("x", app!("f", "x")), "a"));
/// ```
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = Lexer::new(input).tokenize()?;
    let expr = Parser::new(tokens).parse()?;
    Ok(expr)
}

/// Parse and evaluate a lambda calculus expression, returning the printed
/// `R<n>: ...` line of every reduction step.
///
/// Uses a fresh [`Reducer`], so fresh variable names start at `_0`. Does not
/// return for terms without a normal form.
///
/// # Errors
/// Returns an error if lexing or parsing fails.
///
/// # Examples
/// ```
/// use lamb::evaluate_source;
///
/// let lines = evaluate_source("(\\x.x) (\\y.y)").unwrap();
/// assert_eq!(lines, ["R1: (λy.y)"]);
/// ```
pub fn evaluate_source(input: &str) -> Result<Vec<String>> {
    let expr = parse(input)?;
    let lines = Reducer::new()
        .evaluate(expr)
        .map(|step| step.to_string())
        .collect();
    Ok(lines)
}
