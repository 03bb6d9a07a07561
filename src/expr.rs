//! Grammar for late-bound segment sizes.
//!
//! The accepted language is deliberately small: unsigned decimal
//! literals, names bound earlier in the match, `+`, `*` (binding tighter
//! than `+`) and parentheses, with insignificant whitespace. Anything
//! else is rejected with [`Error::InvalidSize`] before any bit is read.

use std::collections::HashMap;

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{alpha1, alphanumeric1, char, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res, recognize};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded};
use nom::{IResult, Parser};

use crate::{Error, Result};

/// Names bound by earlier pattern segments, and their decoded values.
pub type Bindings = HashMap<String, u64>;

#[derive(Debug, PartialEq)]
enum Ast {
    Num(u64),
    Var(String),
    Add(Box<Ast>, Box<Ast>),
    Mul(Box<Ast>, Box<Ast>),
}

const MALFORMED: Error = Error::InvalidSize {
    size: 0,
    msg: "malformed dynamic size expression",
};

fn identifier(i: &str) -> IResult<&str, Ast> {
    let (i, _) = multispace0(i)?;
    map(
        recognize(pair(
            alt((alpha1, tag("_"))),
            many0(alt((alphanumeric1, tag("_")))),
        )),
        |s: &str| Ast::Var(s.to_string()),
    )
    .parse(i)
}

fn number(i: &str) -> IResult<&str, Ast> {
    let (i, _) = multispace0(i)?;
    map_res(digit1, |s: &str| s.parse::<u64>().map(Ast::Num)).parse(i)
}

fn parens(i: &str) -> IResult<&str, Ast> {
    delimited(
        preceded(multispace0, char('(')),
        expression,
        preceded(multispace0, char(')')),
    )
    .parse(i)
}

fn factor(i: &str) -> IResult<&str, Ast> {
    alt((parens, number, identifier)).parse(i)
}

fn term(i: &str) -> IResult<&str, Ast> {
    let (i, first) = factor(i)?;
    let (i, rest) = many0(preceded(preceded(multispace0, char('*')), factor)).parse(i)?;
    let ast = rest
        .into_iter()
        .fold(first, |acc, f| Ast::Mul(Box::new(acc), Box::new(f)));
    Ok((i, ast))
}

fn expression(i: &str) -> IResult<&str, Ast> {
    let (i, first) = term(i)?;
    let (i, rest) = many0(preceded(preceded(multispace0, char('+')), term)).parse(i)?;
    let ast = rest
        .into_iter()
        .fold(first, |acc, t| Ast::Add(Box::new(acc), Box::new(t)));
    Ok((i, ast))
}

impl Ast {
    fn eval(&self, env: &Bindings) -> Result<u64> {
        match self {
            Ast::Num(n) => Ok(*n),
            Ast::Var(name) => env.get(name).copied().ok_or(Error::InvalidSize {
                size: 0,
                msg: "dynamic size references an unbound name",
            }),
            Ast::Add(a, b) => a
                .eval(env)?
                .checked_add(b.eval(env)?)
                .ok_or(Error::InvalidSize {
                    size: 0,
                    msg: "dynamic size expression overflows",
                }),
            Ast::Mul(a, b) => a
                .eval(env)?
                .checked_mul(b.eval(env)?)
                .ok_or(Error::InvalidSize {
                    size: 0,
                    msg: "dynamic size expression overflows",
                }),
        }
    }
}

/// Evaluate a dynamic-size expression against the bound names.
pub fn eval_expression(input: &str, env: &Bindings) -> Result<u64> {
    let (_, ast) = all_consuming(delimited(multispace0, expression, multispace0))
        .parse(input)
        .map_err(|_| MALFORMED)?;
    ast.eval(env)
}

/// Look up a plain name reference.
pub fn eval_name(name: &str, env: &Bindings) -> Result<u64> {
    env.get(name).copied().ok_or(Error::InvalidSize {
        size: 0,
        msg: "dynamic size references an unbound name",
    })
}

#[cfg(test)]
mod tests {
    use super::{eval_expression, eval_name, Bindings};
    use crate::Error;

    fn env(pairs: &[(&str, u64)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect()
    }

    #[test]
    fn literals_and_names() {
        let e = env(&[("n", 3)]);
        assert_eq!(eval_expression("42", &e), Ok(42));
        assert_eq!(eval_expression("n", &e), Ok(3));
        assert_eq!(eval_name("n", &e), Ok(3));
        assert_eq!(eval_expression("_len2", &env(&[("_len2", 7)])), Ok(7));
    }

    #[test]
    fn precedence_and_parens() {
        let e = env(&[("n", 3)]);
        assert_eq!(eval_expression("8 * n + 4", &e), Ok(28));
        assert_eq!(eval_expression("4 + 8*n", &e), Ok(28));
        assert_eq!(eval_expression("2 + 3 * 4", &e), Ok(14));
        assert_eq!(eval_expression("(2 + 3) * 4", &e), Ok(20));
        assert_eq!(eval_expression("  ( n )*( n ) ", &e), Ok(9));
    }

    #[test]
    fn unbound_name() {
        let e = Bindings::new();
        assert_eq!(
            eval_expression("8 * n", &e),
            Err(Error::InvalidSize {
                size: 0,
                msg: "dynamic size references an unbound name"
            })
        );
        assert!(eval_name("n", &e).is_err());
    }

    #[test]
    fn rejects_everything_else() {
        let e = env(&[("n", 3)]);
        for bad in ["n - 1", "n / 2", "", "3 +", "(n", "n)", "0x10", "3.5", "n n"] {
            assert_eq!(
                eval_expression(bad, &e),
                Err(Error::InvalidSize {
                    size: 0,
                    msg: "malformed dynamic size expression"
                }),
                "expression {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn overflow_is_reported() {
        let e = env(&[("n", u64::MAX)]);
        assert!(eval_expression("n + 1", &e).is_err());
        assert!(eval_expression("n * 2", &e).is_err());
    }
}
