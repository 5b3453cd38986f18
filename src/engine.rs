use tracing::{debug, trace};

use crate::{expr::Expr, numeral::decode_numeral};

/// Returns `true` if `name` occurs free in `expr`.
///
/// # Examples
/// ```
/// use lamb::{abs, app, engine::is_free_in};
///
/// assert!(is_free_in("y", &abs!("x", app!("x", "y"))));
/// assert!(!is_free_in("x", &abs!("x", app!("x", "y"))));
/// ```
#[must_use]
pub fn is_free_in(name: &str, expr: &Expr) -> bool {
    match expr {
        Expr::Var(var) => var == name,
        Expr::Abs(param, body) => param != name && is_free_in(name, body),
        Expr::App(func, arg) => is_free_in(name, func) || is_free_in(name, arg),
    }
}

/// Owns the fresh-name counter used by capture-avoiding substitution.
///
/// Fresh names have the form `_0`, `_1`, ... and are never handed out twice
/// by the same reducer, so a single reducer should be kept for a whole
/// session. Separate reducers are fully independent.
#[derive(Debug, Default)]
pub struct Reducer {
    next_fresh: usize,
}

impl Reducer {
    #[must_use]
    pub const fn new() -> Self {
        Self { next_fresh: 0 }
    }

    /// Number of fresh names minted so far.
    #[must_use]
    pub const fn fresh_count(&self) -> usize {
        self.next_fresh
    }

    fn fresh_name(&mut self) -> String {
        let name = format!("_{}", self.next_fresh);
        self.next_fresh += 1;
        debug!(%name, "minted fresh variable");
        name
    }

    /// Substitutes `src` for the free occurrences of `var` in `tgt`.
    ///
    /// When an abstraction in `tgt` binds a name that is free in `src`, its
    /// parameter is renamed to a fresh variable before descending, so no free
    /// variable of `src` is ever captured.
    ///
    /// # Examples
    /// ```
    /// use lamb::{abs, engine::Reducer, expr::Expr};
    ///
    /// let mut reducer = Reducer::new();
    /// // (λy.x)[x := y] renames the binder instead of capturing y
    /// let result = reducer.substitute("x", &Expr::var("y"), &abs!("y", "x"));
    /// assert_eq!(result, abs!("_0", "y"));
    /// ```
    pub fn substitute(&mut self, var: &str, src: &Expr, tgt: &Expr) -> Expr {
        match tgt {
            Expr::Var(name) => {
                if name == var {
                    src.clone()
                } else {
                    tgt.clone()
                }
            }
            Expr::App(func, arg) => {
                let func = self.substitute(var, src, func);
                let arg = self.substitute(var, src, arg);
                Expr::App(Box::new(func), Box::new(arg))
            }
            Expr::Abs(param, body) => {
                if param == var {
                    // `var` is shadowed, nothing to replace below
                    tgt.clone()
                } else if !is_free_in(param, src) {
                    let body = self.substitute(var, src, body);
                    Expr::Abs(param.clone(), Box::new(body))
                } else {
                    let fresh = self.fresh_name();
                    let renamed = self.substitute(param, &Expr::Var(fresh.clone()), body);
                    self.substitute(var, src, &Expr::Abs(fresh, Box::new(renamed)))
                }
            }
        }
    }

    /// Contracts one redex, searching leftmost-outermost along the left spine.
    ///
    /// - under an abstraction, the body is searched;
    /// - in `L R` with `L` an abstraction, the application itself is the redex
    ///   and `R` is substituted unevaluated;
    /// - with `L` an application, only `L` is searched and `R` is left alone;
    /// - with `L` a variable, only `R` is searched.
    ///
    /// # Returns
    /// * `Some(new_expr)` - Expression after one reduction step
    /// * `None` - No redex was found along the search path
    ///
    /// # Examples
    /// ```
    /// use lamb::{abs, app, engine::Reducer, expr::Expr};
    ///
    /// let mut reducer = Reducer::new();
    /// let result = reducer.reduce_once(&app!(abs!("x", "x"), "y"));
    /// assert_eq!(result, Some(Expr::var("y")));
    ///
    /// assert_eq!(reducer.reduce_once(&abs!("x", "x")), None);
    /// ```
    pub fn reduce_once(&mut self, expr: &Expr) -> Option<Expr> {
        match expr {
            Expr::Var(_) => None,
            Expr::Abs(param, body) => self
                .reduce_once(body)
                .map(|body| Expr::Abs(param.clone(), Box::new(body))),
            Expr::App(func, arg) => match func.as_ref() {
                Expr::Abs(param, body) => Some(self.substitute(param, arg, body)),
                Expr::App(..) => self
                    .reduce_once(func)
                    .map(|func| Expr::App(Box::new(func), arg.clone())),
                Expr::Var(_) => self
                    .reduce_once(arg)
                    .map(|arg| Expr::App(func.clone(), Box::new(arg))),
            },
        }
    }

    /// One rewrite step; an irreducible expression comes back unchanged.
    pub fn step(&mut self, expr: &Expr) -> Expr {
        self.reduce_once(expr).unwrap_or_else(|| expr.clone())
    }

    /// Drives [`Reducer::reduce_once`] to a fixed point, yielding every
    /// intermediate expression as a numbered [`Step`].
    ///
    /// An expression that is irreducible from the start is yielded once as
    /// step 1. The iterator never ends for a term without a normal form; cap
    /// it with [`Iterator::take`] where that matters.
    ///
    /// # Examples
    /// ```
    /// use lamb::{abs, app, engine::Reducer};
    ///
    /// let mut reducer = Reducer::new();
    /// let steps: Vec<_> = reducer
    ///     .evaluate(app!(abs!("x", "x"), abs!("f", "z", "z")))
    ///     .map(|step| step.to_string())
    ///     .collect();
    /// assert_eq!(steps, ["R1: (λf.(λz.z)) -> 0"]);
    /// ```
    pub const fn evaluate(&mut self, expr: Expr) -> Steps<'_> {
        Steps {
            reducer: self,
            current: expr,
            index: 0,
            done: false,
        }
    }
}

/// One emitted rewrite step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// 1-based step number.
    pub index: usize,
    pub expr: Expr,
    /// Decoded Church numeral, if the expression has that shape.
    pub numeral: Option<usize>,
}

impl Step {
    #[must_use]
    pub fn new(index: usize, expr: Expr) -> Self {
        let numeral = decode_numeral(&expr);
        Self {
            index,
            expr,
            numeral,
        }
    }
}

/// Renders as `R<n>: <expr>`, followed by ` -> <numeral>` when one decodes.
impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}: {}", self.index, self.expr)?;
        if let Some(n) = self.numeral {
            write!(f, " -> {n}")?;
        }
        Ok(())
    }
}

/// Iterator returned by [`Reducer::evaluate`].
pub struct Steps<'r> {
    reducer: &'r mut Reducer,
    current: Expr,
    index: usize,
    done: bool,
}

impl Iterator for Steps<'_> {
    type Item = Step;

    fn next(&mut self) -> Option<Step> {
        if self.done {
            return None;
        }
        self.index += 1;

        if let Some(next) = self.reducer.reduce_once(&self.current) {
            trace!(step = self.index, expr = %next, "reduced");
            self.current = next;
            Some(Step::new(self.index, self.current.clone()))
        } else {
            debug!(steps = self.index, "reached normal form");
            self.done = true;
            // The input itself is reported when it was already irreducible
            (self.index == 1).then(|| Step::new(1, self.current.clone()))
        }
    }
}
