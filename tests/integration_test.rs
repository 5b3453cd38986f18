use std::{fs, path::PathBuf};

use lamb::{
    Expr, FsLoader, Outcome, ParseError, Reducer, Runner, abs, app, decode_numeral,
    evaluate_source, parse,
};

fn parse_(s: &str) -> Expr {
    let Ok(expr) = parse(s) else {
        panic!("Failed to parse expression: {s}");
    };
    expr
}

/// Last expression the reduction loop reports, with a generous cap.
fn evaluate_(expr: &Expr) -> Expr {
    let Some(step) = Reducer::new().evaluate(expr.clone()).take(10_000).last() else {
        panic!("Evaluation produced no steps: {expr}");
    };
    step.expr
}

fn parse_and_evaluate_(s: &str) -> Expr {
    evaluate_(&parse_(s))
}

fn last_line(s: &str) -> String {
    let Ok(lines) = evaluate_source(s) else {
        panic!("Failed to evaluate: {s}");
    };
    let Some(line) = lines.last() else {
        panic!("No output for: {s}");
    };
    line.clone()
}

/// A scratch directory under the system temp dir, removed on drop.
struct ScratchDir(PathBuf);

impl ScratchDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("lamb-{name}-{}", std::process::id()));
        let Ok(()) = fs::create_dir_all(&dir) else {
            panic!("Failed to create {}", dir.display());
        };
        Self(dir)
    }

    fn write(&self, file: &str, content: &str) -> PathBuf {
        let path = self.0.join(file);
        let Ok(()) = fs::write(&path, content) else {
            panic!("Failed to write {}", path.display());
        };
        path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

#[test]
fn test_variable_capture() {
    // `(λx.x y) z` should have two free variables: `z` and `y`
    assert_eq!(parse_and_evaluate_("(\\x.x y) z"), parse_("z y"));
    // `(λx.λy.x) y` should NOT evaluate to `λy.y`
    assert_eq!(parse_and_evaluate_("(\\x.\\y.x) y"), abs!("_0", "y"));
    // `(λx.λy.λz.x) z` should NOT evaluate to `λy.λz.z`
    assert_eq!(
        parse_and_evaluate_("(\\x.\\y.\\z.x) z"),
        abs!("y", "_0", "z")
    );
}

#[test]
fn test_atomic_reduction() {
    // `(λx.x) a` -> `a` (identity returns the argument)
    assert_eq!(parse_and_evaluate_("(\\x.x) a"), parse_("a"));
    // `(λx.y) a` -> `y` (constant function returns the free variable y)
    assert_eq!(parse_and_evaluate_("(\\x.y) a"), parse_("y"));
    // `(λx.x x) a` -> `a a`
    assert_eq!(parse_and_evaluate_("(\\x.x x) a"), parse_("a a"));
    // `(λx.y x) a` -> `y a`
    assert_eq!(parse_and_evaluate_("(\\x.y x) a"), parse_("y a"));
    // `(λx.λx.x) a` -> `λx.x`, the second `x` shadows the first
    assert_eq!(parse_and_evaluate_("(\\x.\\x.x) a"), parse_("\\x.x"));
    // `(λx.(λy.y) x) a` -> `(λy.y) a` -> `a`
    assert_eq!(parse_and_evaluate_("(\\x.(\\y.y) x) a"), parse_("a"));
}

/// i: identity
fn ski_i() -> Expr {
    parse_("\\x.x")
}

/// k: constant / kestrel
fn ski_k() -> Expr {
    parse_("\\x.\\y.x")
}

/// s: distribution / starling
fn ski_s() -> Expr {
    parse_("\\x.\\y.\\z.x z (y z)")
}

#[test]
fn test_ski_combinator() {
    // `S K K` -> `λz.z`
    assert_eq!(evaluate_(&app!(ski_s(), ski_k(), ski_k())), parse_("\\z.z"));
    // `S K x y` -> `y`
    assert_eq!(evaluate_(&app!(ski_s(), ski_k(), "x", "y")), parse_("y"));
    // `S I I x` -> `x x`
    assert_eq!(evaluate_(&app!(ski_s(), ski_i(), ski_i(), "x")), parse_("x x"));
}

fn true_() -> Expr {
    parse_("\\t.\\f.t")
}

fn false_() -> Expr {
    parse_("\\t.\\f.f")
}

fn and_() -> Expr {
    parse_("\\p.\\q.p q p")
}

fn or_() -> Expr {
    parse_("\\p.\\q.p p q")
}

fn not_() -> Expr {
    app!(parse_("\\T.\\F.\\p.p F T"), true_(), false_())
}

#[test]
fn test_church_boolean() {
    // `true a (a a)` -> `a`
    assert_eq!(evaluate_(&app!(true_(), "a", parse_("a a"))), parse_("a"));
    // `false a (a a)` -> `a a`
    assert_eq!(evaluate_(&app!(false_(), "a", parse_("a a"))), parse_("a a"));
}

#[test]
fn test_church_logic() {
    assert_eq!(evaluate_(&app!(not_(), true_())), false_());
    assert_eq!(evaluate_(&app!(not_(), false_())), true_());

    assert_eq!(evaluate_(&app!(and_(), true_(), true_())), true_());
    assert_eq!(evaluate_(&app!(and_(), true_(), false_())), false_());
    assert_eq!(evaluate_(&app!(and_(), false_(), true_())), false_());
    assert_eq!(evaluate_(&app!(and_(), false_(), false_())), false_());

    assert_eq!(evaluate_(&app!(or_(), true_(), true_())), true_());
    assert_eq!(evaluate_(&app!(or_(), true_(), false_())), true_());
    assert_eq!(evaluate_(&app!(or_(), false_(), true_())), true_());
    assert_eq!(evaluate_(&app!(or_(), false_(), false_())), false_());
}

const NATURALS: &str = "
let 0 = \\f.\\x.x in
let succ = \\n.\\f.\\x.f (n f x) in
let plus = \\m.\\n.\\f.\\x.m f (n f x) in
let mult = \\m.\\n.\\f.m (n f) in
";

#[test]
fn test_church_successor_terminates() {
    let lines = evaluate_source(
        "let 0=\\f.\\x.x in let succ=\\n.\\f.\\x.f (n f x) in succ (succ 0)",
    )
    .unwrap_or_default();
    assert!(lines.len() > 1);
    for (i, line) in lines.iter().enumerate() {
        assert!(line.starts_with(&format!("R{}: ", i + 1)), "bad line {line}");
    }
    assert!(lines.last().is_some_and(|line| line.ends_with("-> 2")));
}

#[test]
fn test_church_arithmetic() {
    let two = "(succ (succ 0))";
    let three = "(succ (succ (succ 0)))";
    assert!(last_line(&format!("{NATURALS} plus {two} {three}")).ends_with("-> 5"));
    assert!(last_line(&format!("{NATURALS} mult {two} {three}")).ends_with("-> 6"));
    assert!(last_line(&format!("{NATURALS} 0")).ends_with("-> 0"));
}

#[test]
fn test_let_desugaring_equivalence() {
    let sugared = parse_("let x = \\a.a in x x");
    assert_eq!(sugared, app!(abs!("x", app!("x", "x")), abs!("a", "a")));

    // The first step of the let form is the direct substitution
    let mut reducer = Reducer::new();
    let steps: Vec<_> = reducer.evaluate(sugared).collect();
    assert_eq!(steps[0].expr, parse_("(\\a.a) (\\a.a)"));
    assert_eq!(
        steps.last().map(|s| s.expr.clone()),
        Some(parse_and_evaluate_("(\\a.a) (\\a.a)"))
    );
}

#[test]
fn test_omega_never_reaches_fixed_point() {
    let mut reducer = Reducer::new();
    let omega = parse_("(\\x.x x)(\\x.x x)");
    let count = reducer.evaluate(omega).take(1000).count();
    assert_eq!(count, 1000);
}

#[test]
fn test_lex_error() {
    let Err(err) = parse("\\x.x\t") else {
        panic!("expected a lex error");
    };
    let Some(err) = err.downcast_ref::<lamb::LexError>() else {
        panic!("expected a lex error, got {err}");
    };
    assert_eq!(err.ch, '\t');
    assert_eq!(err.scanned.len(), 4);
}

#[test]
fn test_parse_error_reports_position() {
    let Err(err) = parse("\\x x") else {
        panic!("expected a parse error");
    };
    let Some(err) = err.downcast_ref::<ParseError>() else {
        panic!("expected a parse error, got {err}");
    };
    assert_eq!(err.position(), (1, 4));
}

#[test]
fn test_decode_numeral_after_evaluation() {
    let result = parse_and_evaluate_("(\\n.\\f.\\x.f (n f x)) (\\f.\\x.f x)");
    assert_eq!(decode_numeral(&result), Some(2));
}

#[test]
fn test_runner_with_library_file() {
    let dir = ScratchDir::new("lib");
    dir.write("nat.la", NATURALS);

    let mut runner = Runner::new(FsLoader::new(&dir.0));
    let mut out = Vec::new();
    let outcome = runner.run("#use nat\nplus (succ 0) (succ 0)", &mut out);
    assert!(matches!(outcome, Ok(Outcome::Normalized { .. })));
    let out = String::from_utf8(out).unwrap_or_default();
    assert!(out.lines().last().is_some_and(|line| line.ends_with("-> 2")));
}

#[test]
fn test_runner_missing_library_file_is_fatal() {
    let dir = ScratchDir::new("missing");
    let mut runner = Runner::new(FsLoader::new(&dir.0));
    let mut out = Vec::new();
    assert!(runner.run("#use nowhere x", &mut out).is_err());
    assert!(out.is_empty());
}

#[test]
fn test_run_file() {
    let dir = ScratchDir::new("file");
    let path = dir.write("main.la", "// the identity\n(\\x.x) y\n");

    let mut runner = Runner::new(FsLoader::new(&dir.0));
    let mut out = Vec::new();
    let outcome = runner.run_file(&path, &mut out);
    assert!(matches!(outcome, Ok(Outcome::Normalized { steps: 1 })));
    assert_eq!(String::from_utf8(out).unwrap_or_default(), "R1: y\n");
}

#[test]
fn test_run_file_reads_path_outside_lib_dir() {
    let libs = ScratchDir::new("empty-libs");
    let programs = ScratchDir::new("programs");
    let path = programs.write("two.la", "\\f.\\x.f (f x)");

    let mut runner = Runner::new(FsLoader::new(&libs.0));
    let mut out = Vec::new();
    let outcome = runner.run_file(&path, &mut out);
    assert!(matches!(outcome, Ok(Outcome::Normalized { steps: 1 })));
    assert_eq!(
        String::from_utf8(out).unwrap_or_default(),
        "R1: (λf.(λx.(f (f x)))) -> 2\n"
    );
}
