use std::{
    collections::HashMap,
    hash::BuildHasher,
    io::Write,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    engine::Reducer,
    lexer::{LexError, Lexer},
    parser::{ParseError, Parser},
};

const USE_DIRECTIVE: &str = "#use";

/// Extension appended to the name in a `#use NAME` directive.
pub const EXTENSION: &str = ".la";

/// Source of the files pulled in by `#use` directives.
pub trait Loader {
    /// Returns the full contents of the file `name`.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read.
    fn load_file(&self, name: &str) -> Result<String>;
}

/// Loads files from a directory on disk.
#[derive(Debug, Clone)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Default for FsLoader {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Loader for FsLoader {
    fn load_file(&self, name: &str) -> Result<String> {
        let path = self.root.join(name);
        std::fs::read_to_string(&path)
            .with_context(|| format!("failed to load file {}", path.display()))
    }
}

/// In-memory files keyed by file name.
impl<S: BuildHasher> Loader for HashMap<String, String, S> {
    fn load_file(&self, name: &str) -> Result<String> {
        self.get(name)
            .cloned()
            .ok_or_else(|| anyhow!("failed to load file {name}: no such file"))
    }
}

/// Replaces every `#use NAME` directive with the contents of `NAME.la`.
///
/// `NAME` is a run of ASCII letters, digits and underscores separated from
/// `#use` by at least one whitespace character. Loaded contents are inserted
/// verbatim and not scanned for further directives.
///
/// # Errors
/// Returns the loader's error if a referenced file cannot be read.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use lamb::runner::preprocess;
///
/// let files = HashMap::from([("id.la".to_string(), "let id = \\x.x in".to_string())]);
/// let source = preprocess("#use id id y", &files).unwrap();
/// assert_eq!(source, "let id = \\x.x in id y");
/// ```
pub fn preprocess(source: &str, loader: &impl Loader) -> Result<String> {
    let mut output = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find(USE_DIRECTIVE) {
        output.push_str(&rest[..start]);
        let after = &rest[start + USE_DIRECTIVE.len()..];

        let name_start = after.len() - after.trim_start_matches(is_space).len();
        let name_len = after[name_start..]
            .find(|ch: char| !is_word_char(ch))
            .unwrap_or(after.len() - name_start);
        if name_start == 0 || name_len == 0 {
            // Not a directive, keep the text as is
            output.push_str(USE_DIRECTIVE);
            rest = after;
            continue;
        }

        let name = &after[name_start..name_start + name_len];
        debug!(name, "expanding #use directive");
        output.push_str(&loader.load_file(&format!("{name}{EXTENSION}"))?);
        rest = &after[name_start + name_len..];
    }

    output.push_str(rest);
    Ok(output)
}

const fn is_space(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

const fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Why an input was rejected before evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// What happened to one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The input contained no tokens; nothing was printed.
    Empty,
    /// The input failed to lex or parse; a blank line was printed.
    Rejected(InputError),
    /// The input reached normal form after printing `steps` lines.
    Normalized { steps: usize },
}

/// Runs programs end to end: `#use` expansion, lexing, parsing and the
/// step-by-step reduction, printing one `R<n>: ...` line per step.
///
/// One runner keeps one [`Reducer`], so fresh variable names stay unique
/// across all inputs it runs.
pub struct Runner<L> {
    reducer: Reducer,
    loader: L,
}

impl<L: Loader> Runner<L> {
    #[must_use]
    pub const fn new(loader: L) -> Self {
        Self {
            reducer: Reducer::new(),
            loader,
        }
    }

    /// Runs one input and writes its steps to `out`.
    ///
    /// Does not return while the term keeps reducing without reaching a
    /// normal form.
    ///
    /// # Errors
    /// Returns an error if a `#use` file cannot be loaded or `out` cannot be
    /// written. Lex and parse failures are not errors: they are logged, a
    /// blank line is written, and [`Outcome::Rejected`] is returned.
    ///
    /// # Examples
    /// ```
    /// use lamb::runner::{FsLoader, Outcome, Runner};
    ///
    /// let mut runner = Runner::new(FsLoader::default());
    /// let mut out = Vec::new();
    /// let outcome = runner.run("(\\x.x) (\\f.\\x.f x)", &mut out).unwrap();
    /// assert_eq!(outcome, Outcome::Normalized { steps: 1 });
    /// assert_eq!(String::from_utf8(out).unwrap(), "R1: (λf.(λx.(f x))) -> 1\n");
    /// ```
    pub fn run(&mut self, source: &str, out: &mut impl Write) -> Result<Outcome> {
        let source = preprocess(source, &self.loader)?;

        let tokens = match Lexer::new(&source).tokenize() {
            Ok(tokens) => tokens,
            Err(err) => return Self::reject(err.into(), out),
        };
        if tokens.is_empty() {
            return Ok(Outcome::Empty);
        }
        let expr = match Parser::new(tokens).parse() {
            Ok(expr) => expr,
            Err(err) => return Self::reject(err.into(), out),
        };

        let mut steps = 0;
        for step in self.reducer.evaluate(expr) {
            writeln!(out, "{step}").context("failed to write reduction step")?;
            steps = step.index;
        }
        Ok(Outcome::Normalized { steps })
    }

    /// Reads the program in `path` and runs it.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, plus everything
    /// [`Runner::run`] reports.
    pub fn run_file(&mut self, path: impl AsRef<Path>, out: &mut impl Write) -> Result<Outcome> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to load file {}", path.display()))?;
        self.run(&source, out)
    }

    fn reject(err: InputError, out: &mut impl Write) -> Result<Outcome> {
        warn!(%err, "input rejected");
        writeln!(out).context("failed to write output")?;
        Ok(Outcome::Rejected(err))
    }
}
