use crate::expr::Expr;

/// Decodes a Church numeral `λf.λx.f (f (... (f x)))` into the number of
/// applications of `f`.
///
/// Only this exact shape matches; anything else yields `None`.
///
/// # Examples
/// ```
/// use lamb::{abs, app, numeral::decode_numeral};
///
/// assert_eq!(decode_numeral(&abs!("f", "x", "x")), Some(0));
/// assert_eq!(decode_numeral(&abs!("f", "x", app!("f", app!("f", "x")))), Some(2));
/// assert_eq!(decode_numeral(&abs!("x", "x")), None);
/// ```
#[must_use]
pub fn decode_numeral(expr: &Expr) -> Option<usize> {
    let Expr::Abs(f, body) = expr else {
        return None;
    };
    let Expr::Abs(x, body) = body.as_ref() else {
        return None;
    };

    let mut depth = 0;
    let mut current = body.as_ref();
    loop {
        match current {
            Expr::Var(name) if name == x => return Some(depth),
            Expr::App(func, arg) if matches!(func.as_ref(), Expr::Var(name) if name == f) => {
                depth += 1;
                current = arg.as_ref();
            }
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abs, app};

    fn church(n: usize) -> Expr {
        let body = (0..n).fold(Expr::var("x"), |acc, _| app!("f", acc));
        abs!("f", "x", body)
    }

    #[test]
    fn test_decode_small_numerals() {
        for n in [0, 1, 2, 3, 10] {
            assert_eq!(decode_numeral(&church(n)), Some(n));
        }
    }

    #[test]
    fn test_decode_other_names() {
        assert_eq!(
            decode_numeral(&abs!("s", "z", app!("s", app!("s", "z")))),
            Some(2)
        );
    }

    #[test]
    fn test_reject_wrong_variable() {
        // λf.λx.f y
        assert_eq!(decode_numeral(&abs!("f", "x", app!("f", "y"))), None);
        // λf.λx.x (f x)
        assert_eq!(decode_numeral(&abs!("f", "x", app!("x", app!("f", "x")))), None);
        // λf.λx.f
        assert_eq!(decode_numeral(&abs!("f", "x", "f")), None);
    }

    #[test]
    fn test_reject_extra_structure() {
        // λf.λx.f x x
        assert_eq!(decode_numeral(&abs!("f", "x", app!("f", "x", "x"))), None);
        // λf.λx.λy.x
        assert_eq!(decode_numeral(&abs!("f", "x", "y", "x")), None);
        // λf.λx.f (λy.x)
        assert_eq!(decode_numeral(&abs!("f", "x", app!("f", abs!("y", "x")))), None);
    }

    #[test]
    fn test_reject_non_abstractions() {
        assert_eq!(decode_numeral(&Expr::var("x")), None);
        assert_eq!(decode_numeral(&app!(church(1), church(2))), None);
        assert_eq!(decode_numeral(&abs!("x", "x")), None);
    }

    #[test]
    fn test_same_binder_names() {
        // λx.λx.x: the final variable check comes first
        assert_eq!(decode_numeral(&abs!("x", "x", "x")), Some(0));
        // λx.λx.x x: the head matches the outer name, the tail the inner one
        assert_eq!(decode_numeral(&abs!("x", "x", app!("x", "x"))), Some(1));
    }
}
