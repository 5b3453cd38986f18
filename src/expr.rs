/// Lambda calculus expression (using named variables)
///
/// This enum represents expressions in the untyped lambda calculus:
/// - `Var(String)`: Variable, compared by its literal name
/// - `Abs(String, Box<Expr>)`: Lambda abstraction (parameter, function body)
/// - `App(Box<Expr>, Box<Expr>)`: Application (function call)
///
/// Two expressions are equal only if they are structurally identical,
/// including the names of bound variables.
///
/// # Examples
/// ```
/// use lamb::expr::Expr;
/// let id = Expr::Abs("x".to_string(), Box::new(Expr::Var("x".to_string()))); // λx.x
/// assert_eq!(id.to_string(), "(λx.x)");
/// ```
#[derive(Hash, Clone, PartialEq, Eq)]
pub enum Expr {
    Var(String),               // Variable name
    Abs(String, Box<Expr>),    // Lambda abstraction (parameter, body)
    App(Box<Expr>, Box<Expr>), // Application (e1 e2)
}

impl Expr {
    #[must_use]
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    #[must_use]
    pub fn abs(param: impl Into<String>, body: impl IntoExpr) -> Self {
        Self::Abs(param.into(), Box::new(body.into_expr()))
    }

    #[must_use]
    pub fn app(func: impl IntoExpr, arg: impl IntoExpr) -> Self {
        Self::App(Box::new(func.into_expr()), Box::new(arg.into_expr()))
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var(name) => write!(f, "Var({name})"),
            Self::Abs(param, body) => write!(f, "Abs({param}, {body:?})"),
            Self::App(func, arg) => write!(f, "App({func:?}, {arg:?})"),
        }
    }
}

/// Fully parenthesized rendering: `x`, `(λx.body)`, `(func arg)`.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Var(name) => write!(f, "{name}"),
            Self::Abs(param, body) => write!(f, "(λ{param}.{body})"),
            Self::App(func, arg) => write!(f, "({func} {arg})"),
        }
    }
}

/// Conversion into an [`Expr`], used by the constructors and the `app!` and
/// `abs!` macros. Strings become variables.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

impl IntoExpr for &str {
    fn into_expr(self) -> Expr {
        Expr::Var(self.to_string())
    }
}

impl IntoExpr for String {
    fn into_expr(self) -> Expr {
        Expr::Var(self)
    }
}

/// Builds a left-associative application: `app!(f, x, y)` is `((f x) y)`.
///
/// # Examples
/// ```
/// use lamb::app;
/// assert_eq!(app!("f", "x", "y").to_string(), "((f x) y)");
/// ```
#[macro_export]
macro_rules! app {
    ($func:expr, $($arg:expr),+ $(,)?) => {{
        let expr = $crate::expr::IntoExpr::into_expr($func);
        $(let expr = $crate::expr::Expr::app(expr, $arg);)+
        expr
    }};
}

/// Builds nested abstractions: `abs!("f", "x", body)` is `λf.λx.body`.
///
/// # Examples
/// ```
/// use lamb::{abs, app};
/// assert_eq!(abs!("f", "x", app!("f", "x")).to_string(), "(λf.(λx.(f x)))");
/// ```
#[macro_export]
macro_rules! abs {
    ($param:expr, $body:expr $(,)?) => {
        $crate::expr::Expr::abs($param, $body)
    };
    ($param:expr, $($rest:expr),+ $(,)?) => {
        $crate::expr::Expr::abs($param, $crate::abs!($($rest),+))
    };
}
