//! Expression grammar.
//!
//! ```text
//! sum     := product (("+" | "-") product)*
//! product := unary (("*" | "/" | "%") unary)*
//! unary   := ("-" | "+") unary | primary
//! primary := integer | string | name ("." name)? | "(" sum ")"
//! ```
//!
//! Integers are decimal or `0x` hexadecimal. Strings are double-quoted with
//! backslash escapes. Names may contain letters, digits, `_` and `$`.

use winnow::{
    Parser as _,
    ascii::{digit1, hex_digit1, multispace0},
    combinator::{alt, cut_err, delimited, eof, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    token::{any, none_of, one_of, take_while},
};

use super::ExprError;

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Expr {
    Int(i32),
    Str(String),
    Var(String),
    Member { name: String, member: String },
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
enum Context {
    /// Description of what was expected
    Label(&'static str),
}

type Input<'a> = &'a str;
type IResult<O> = Result<O, ErrMode<ContextError<Context>>>;

fn binary(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

fn name<'a>(input: &mut Input<'a>) -> IResult<&'a str> {
    take_while(1.., is_name_char)
        .verify(|s: &str| !s.starts_with(|c: char| c.is_ascii_digit()))
        .parse_next(input)
}

fn integer(input: &mut Input<'_>) -> IResult<Expr> {
    alt((
        preceded(
            alt(("0x", "0X")),
            cut_err(hex_digit1.try_map(|hex: &str| u32::from_str_radix(hex, 16)))
                .context(Context::Label("hexadecimal digits")),
        )
        .map(|v| Expr::Int(v as i32)),
        digit1.try_map(|dec: &str| dec.parse::<i32>()).map(Expr::Int),
    ))
    .parse_next(input)
}

fn escape(input: &mut Input<'_>) -> IResult<char> {
    preceded('\\', any)
        .map(|c| match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            other => other,
        })
        .parse_next(input)
}

fn string_literal(input: &mut Input<'_>) -> IResult<Expr> {
    '"'.parse_next(input)?;
    let text = repeat(0.., alt((escape, none_of(['"', '\\']))))
        .fold(String::new, |mut acc, c| {
            acc.push(c);
            acc
        })
        .parse_next(input)?;
    cut_err('"')
        .context(Context::Label("closing quote"))
        .parse_next(input)?;
    Ok(Expr::Str(text))
}

fn variable(input: &mut Input<'_>) -> IResult<Expr> {
    let var = name.parse_next(input)?;
    let member = opt(preceded(
        '.',
        cut_err(name).context(Context::Label("member name")),
    ))
    .parse_next(input)?;

    Ok(match member {
        Some(member) => Expr::Member {
            name: var.to_string(),
            member: member.to_string(),
        },
        None => Expr::Var(var.to_string()),
    })
}

fn parenthesized(input: &mut Input<'_>) -> IResult<Expr> {
    delimited(
        '(',
        cut_err(sum),
        cut_err(preceded(multispace0, ')')).context(Context::Label("closing parenthesis")),
    )
    .parse_next(input)
}

fn primary(input: &mut Input<'_>) -> IResult<Expr> {
    preceded(
        multispace0,
        alt((integer, string_literal, variable, parenthesized)),
    )
    .context(Context::Label("operand"))
    .parse_next(input)
}

fn unary(input: &mut Input<'_>) -> IResult<Expr> {
    multispace0.parse_next(input)?;
    alt((
        preceded('-', cut_err(unary)).map(|e| Expr::Neg(Box::new(e))),
        preceded('+', cut_err(unary)),
        primary,
    ))
    .parse_next(input)
}

fn product(input: &mut Input<'_>) -> IResult<Expr> {
    let mut lhs = unary.parse_next(input)?;
    while let Some(op) = opt(preceded(multispace0, one_of(['*', '/', '%']))).parse_next(input)? {
        let rhs = cut_err(unary).parse_next(input)?;
        let op = match op {
            '*' => BinOp::Mul,
            '/' => BinOp::Div,
            _ => BinOp::Rem,
        };
        lhs = binary(op, lhs, rhs);
    }
    Ok(lhs)
}

fn sum(input: &mut Input<'_>) -> IResult<Expr> {
    let mut lhs = product.parse_next(input)?;
    while let Some(op) = opt(preceded(multispace0, one_of(['+', '-']))).parse_next(input)? {
        let rhs = cut_err(product).parse_next(input)?;
        let op = if op == '+' { BinOp::Add } else { BinOp::Sub };
        lhs = binary(op, lhs, rhs);
    }
    Ok(lhs)
}

fn expression(input: &mut Input<'_>) -> IResult<Expr> {
    let expr = sum.parse_next(input)?;
    preceded(multispace0, cut_err(eof))
        .context(Context::Label("an operator or the end of the expression"))
        .parse_next(input)?;
    Ok(expr)
}

/// Parses `text` as a complete expression.
pub(crate) fn parse(text: &str) -> Result<Expr, ExprError> {
    let mut input = text;
    expression(&mut input).map_err(|err| {
        let expected = match &err {
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().map(|ctx| match ctx {
                Context::Label(label) => *label,
            }),
            ErrMode::Incomplete(_) => None,
        };
        ExprError::Syntax {
            expr: text.to_string(),
            expected: expected.unwrap_or("operand").to_string(),
            offset: text.len() - input.len(),
        }
    })
}
