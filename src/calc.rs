//! The delegated arithmetic calculator behind the `calc.<expr>` variable.
//!
//! The engine itself carries no expression language; it hands the raw
//! expression and an identifier resolver to a [`Calculator`]. The default
//! implementation parses `+ - * / ( )` with unary minus, numbers, and
//! dotted identifiers.

use winnow::combinator::{alt, delimited, opt, preceded};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::{one_of, take_while};

use crate::types::error::EvalError;

/// Evaluates an arithmetic expression, resolving free identifiers through
/// the supplied callback.
pub trait Calculator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`EvalError::Calc`] for syntax or arithmetic failures, and
    /// whatever the resolver reports for an identifier it cannot supply.
    fn eval(
        &self,
        expr: &str,
        resolve: &mut dyn FnMut(&str) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError>;
}

/// The built-in [`Calculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCalculator;

impl DefaultCalculator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Calculator for DefaultCalculator {
    fn eval(
        &self,
        expr: &str,
        resolve: &mut dyn FnMut(&str) -> Result<f64, EvalError>,
    ) -> Result<f64, EvalError> {
        let node = parse(expr).map_err(|detail| EvalError::Calc {
            expr: expr.to_owned(),
            detail,
        })?;
        eval_node(&node, expr, resolve)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Num(f64),
    Ident(String),
    Neg(Box<Node>),
    Binary {
        op: BinOp,
        lhs: Box<Node>,
        rhs: Box<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Node {
    fn binary(op: BinOp, lhs: Node, rhs: Node) -> Node {
        Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }
}

fn eval_node(
    node: &Node,
    expr: &str,
    resolve: &mut dyn FnMut(&str) -> Result<f64, EvalError>,
) -> Result<f64, EvalError> {
    match node {
        Node::Num(n) => Ok(*n),
        Node::Ident(name) => resolve(name),
        Node::Neg(inner) => Ok(-eval_node(inner, expr, resolve)?),
        Node::Binary { op, lhs, rhs } => {
            let a = eval_node(lhs, expr, resolve)?;
            let b = eval_node(rhs, expr, resolve)?;
            match op {
                BinOp::Add => Ok(a + b),
                BinOp::Sub => Ok(a - b),
                BinOp::Mul => Ok(a * b),
                BinOp::Div => {
                    if b == 0.0 {
                        return Err(EvalError::Calc {
                            expr: expr.to_owned(),
                            detail: "division by zero".to_owned(),
                        });
                    }
                    Ok(a / b)
                }
            }
        }
    }
}

// -- Grammar ----------------------------------------------------------------

fn parse(input: &str) -> Result<Node, String> {
    delimited(ws, expr, ws)
        .parse(input)
        .map_err(|e| e.to_string())
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_ascii_whitespace())
        .void()
        .parse_next(input)
}

fn ident(input: &mut &str) -> ModalResult<String> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .map(str::to_owned)
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<f64> {
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        opt(('.', take_while(1.., |c: char| c.is_ascii_digit()))),
    )
        .take()
        .map(|s: &str| s.parse().unwrap_or(0.0))
        .parse_next(input)
}

fn atom(input: &mut &str) -> ModalResult<Node> {
    preceded(
        ws,
        alt((
            ident.map(Node::Ident),
            number.map(Node::Num),
            delimited('(', expr, preceded(ws, ')')),
            preceded('-', atom).map(|n| Node::Neg(Box::new(n))),
        )),
    )
    .parse_next(input)
}

fn term(input: &mut &str) -> ModalResult<Node> {
    let mut node = atom(input)?;
    loop {
        let op = opt(preceded(ws, one_of(['*', '/']))).parse_next(input)?;
        match op {
            Some('*') => node = Node::binary(BinOp::Mul, node, atom(input)?),
            Some('/') => node = Node::binary(BinOp::Div, node, atom(input)?),
            _ => return Ok(node),
        }
    }
}

fn expr(input: &mut &str) -> ModalResult<Node> {
    let mut node = term(input)?;
    loop {
        let op = opt(preceded(ws, one_of(['+', '-']))).parse_next(input)?;
        match op {
            Some('+') => node = Node::binary(BinOp::Add, node, term(input)?),
            Some('-') => node = Node::binary(BinOp::Sub, node, term(input)?),
            _ => return Ok(node),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(expr: &str) -> Result<f64, EvalError> {
        let calc = DefaultCalculator::new();
        let mut resolve = |name: &str| -> Result<f64, EvalError> {
            match name {
                "x" => Ok(3.0),
                "user.score" => Ok(80.0),
                other => Err(EvalError::Resolve {
                    name: other.to_owned(),
                    detail: "unknown identifier".to_owned(),
                }),
            }
        };
        calc.eval(expr, &mut resolve)
    }

    #[test]
    fn literals_and_precedence() {
        assert_eq!(eval("1 + 2 * 3").unwrap(), 7.0);
        assert_eq!(eval("(1 + 2) * 3").unwrap(), 9.0);
        assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval("8 / 2 / 2").unwrap(), 2.0);
        assert_eq!(eval("2.5 * 4").unwrap(), 10.0);
    }

    #[test]
    fn unary_minus() {
        assert_eq!(eval("-3 + 5").unwrap(), 2.0);
        assert_eq!(eval("2 * -x").unwrap(), -6.0);
        assert_eq!(eval("-(1 + 2)").unwrap(), -3.0);
    }

    #[test]
    fn identifiers_resolve() {
        assert_eq!(eval("x * x").unwrap(), 9.0);
        assert_eq!(eval("user.score / 10").unwrap(), 8.0);
    }

    #[test]
    fn unknown_identifier_propagates() {
        let err = eval("x + missing").unwrap_err();
        assert!(matches!(err, EvalError::Resolve { .. }));
    }

    #[test]
    fn division_by_zero() {
        let err = eval("1 / 0").unwrap_err();
        assert!(matches!(err, EvalError::Calc { .. }));
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn syntax_error() {
        assert!(matches!(eval("1 +"), Err(EvalError::Calc { .. })));
        assert!(matches!(eval("(1 + 2"), Err(EvalError::Calc { .. })));
        assert!(matches!(eval(""), Err(EvalError::Calc { .. })));
    }

    #[test]
    fn whitespace_is_insignificant() {
        assert_eq!(eval("  1+2 *  3 ").unwrap(), 7.0);
    }
}
