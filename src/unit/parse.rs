//! Unit expression parsing.
//!
//! ```text
//! compound       := offset (':' offset)*
//! offset         := multiplicative (('+' | '-') number)?
//! multiplicative := power (('*' | '·' | '/') power)*
//! power          := primary ('^' (int | '(' int '/' int ')'))?
//! primary        := number | symbol | '(' compound ')'
//! ```
//!
//! Integer operands of `*` and `/` scale exactly (`m*1000`, `kg/1000`), decimal
//! operands scale by a floating factor (`m*0.3048`). The literal `1` stands for
//! the dimensionless unit (`1/s`).

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{take_while, take_while1},
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, opt, recognize},
    sequence::{delimited, pair, preceded, separated_pair},
};
use thiserror::Error;

use crate::converter::ConversionError;

use super::{Unit, UnitCatalog};

/// Errors raised while turning text into a [`Unit`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UnitParseError {
    /// No unit expression was given.
    #[error("Empty unit expression")]
    Empty,

    /// The symbol is not defined in the catalog in use.
    #[error("Unknown unit symbol: {0}")]
    UnknownSymbol(String),

    /// The text is not a well-formed unit expression.
    #[error("Invalid unit expression '{input}' near '{remaining}'")]
    Syntax { input: String, remaining: String },

    /// An exponent with a zero root.
    #[error("Invalid exponent: {0}")]
    InvalidExponent(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Parsed, not yet resolved, unit expression.
#[derive(Debug, Clone, PartialEq)]
enum UnitExpr {
    Symbol(String),
    Integer(i64),
    Decimal(f64),
    Multiply(Box<UnitExpr>, Box<UnitExpr>),
    Divide(Box<UnitExpr>, Box<UnitExpr>),
    Power(Box<UnitExpr>, i32, i32),
    Offset(Box<UnitExpr>, f64),
    Compound(Box<UnitExpr>, Box<UnitExpr>),
}

impl UnitExpr {
    fn evaluate(&self, catalog: &UnitCatalog) -> Result<Unit, UnitParseError> {
        match self {
            UnitExpr::Symbol(symbol) => catalog
                .resolve(symbol)
                .cloned()
                .ok_or_else(|| UnitParseError::UnknownSymbol(symbol.clone())),
            UnitExpr::Integer(n) => Ok(Unit::one().times_factor(*n)?),
            UnitExpr::Decimal(f) => Ok(Unit::one().times_f64(*f)?),
            UnitExpr::Multiply(left, right) => match (left.as_ref(), right.as_ref()) {
                (expr, UnitExpr::Integer(n)) | (UnitExpr::Integer(n), expr) => {
                    Ok(expr.evaluate(catalog)?.times_factor(*n)?)
                }
                (expr, UnitExpr::Decimal(f)) | (UnitExpr::Decimal(f), expr) => {
                    Ok(expr.evaluate(catalog)?.times_f64(*f)?)
                }
                (left, right) => Ok(left.evaluate(catalog)?.checked_times(&right.evaluate(catalog)?)?),
            },
            UnitExpr::Divide(left, right) => match right.as_ref() {
                UnitExpr::Integer(n) => Ok(left.evaluate(catalog)?.divide_factor(*n)?),
                UnitExpr::Decimal(f) => Ok(left.evaluate(catalog)?.times_f64(1.0 / f)?),
                right => Ok(left.evaluate(catalog)?.checked_divide(&right.evaluate(catalog)?)?),
            },
            UnitExpr::Power(base, pow, root) => {
                if *root == 0 {
                    return Err(UnitParseError::InvalidExponent(format!("{}/{}", pow, root)));
                }
                let unit = base.evaluate(catalog)?.checked_pow(*pow)?;
                if *root == 1 {
                    Ok(unit)
                } else {
                    Ok(unit.root(*root)?)
                }
            }
            UnitExpr::Offset(base, offset) => Ok(base.evaluate(catalog)?.plus(*offset)?),
            UnitExpr::Compound(high, low) => Ok(high
                .evaluate(catalog)?
                .compound(&low.evaluate(catalog)?)?),
        }
    }
}

/// Parse whitespace (spaces, tabs, newlines)
fn ws<'a, P, O>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_symbol_start(c: char) -> bool {
    c.is_alphabetic() || matches!(c, '_' | '°' | '€' | '$' | '%' | '\'' | '"')
}

fn is_symbol_continue(c: char) -> bool {
    is_symbol_start(c) || c.is_ascii_digit()
}

/// Parse a unit symbol (`m`, `kg`, `°C`, `€`)
fn symbol(input: &str) -> IResult<&str, UnitExpr> {
    map(
        recognize(pair(
            take_while1(is_symbol_start),
            take_while(is_symbol_continue),
        )),
        |s: &str| UnitExpr::Symbol(s.to_string()),
    )
    .parse(input)
}

/// Parse an unsigned integer or decimal literal
fn number(input: &str) -> IResult<&str, UnitExpr> {
    alt((
        map_res(recognize((digit1, char('.'), digit1)), |s: &str| {
            s.parse::<f64>().map(UnitExpr::Decimal)
        }),
        map_res(digit1, |s: &str| s.parse::<i64>().map(UnitExpr::Integer)),
    ))
    .parse(input)
}

fn offset_value(input: &str) -> IResult<&str, f64> {
    map_res(recognize(pair(digit1, opt(pair(char('.'), digit1)))), |s: &str| {
        s.parse::<f64>()
    })
    .parse(input)
}

fn signed_integer(input: &str) -> IResult<&str, i32> {
    map_res(recognize(pair(opt(char('-')), digit1)), |s: &str| {
        s.parse::<i32>()
    })
    .parse(input)
}

/// Parse an exponent: `^2`, `^-1` or `^(3/2)`
fn exponent(input: &str) -> IResult<&str, (i32, i32)> {
    preceded(
        ws(char('^')),
        alt((
            delimited(
                ws(char('(')),
                separated_pair(ws(signed_integer), char('/'), ws(signed_integer)),
                ws(char(')')),
            ),
            map(signed_integer, |pow| (pow, 1)),
        )),
    )
    .parse(input)
}

/// Parse a parenthesised expression
fn parentheses(input: &str) -> IResult<&str, UnitExpr> {
    delimited(ws(char('(')), compound, ws(char(')'))).parse(input)
}

fn primary(input: &str) -> IResult<&str, UnitExpr> {
    alt((ws(number), ws(symbol), parentheses)).parse(input)
}

fn power(input: &str) -> IResult<&str, UnitExpr> {
    let (input, base) = primary(input)?;

    if let Ok((input, (pow, root))) = exponent(input) {
        Ok((input, UnitExpr::Power(Box::new(base), pow, root)))
    } else {
        Ok((input, base))
    }
}

/// Parse multiplication and division (left-associative)
fn multiplicative(input: &str) -> IResult<&str, UnitExpr> {
    let (mut input, mut left) = power(input)?;

    loop {
        let op_result = alt((ws(char('*')), ws(char('·')), ws(char('/')))).parse(input);

        if let Ok((new_input, op)) = op_result {
            let (new_input, right) = power(new_input)?;
            input = new_input;
            left = match op {
                '/' => UnitExpr::Divide(Box::new(left), Box::new(right)),
                _ => UnitExpr::Multiply(Box::new(left), Box::new(right)),
            };
        } else {
            break;
        }
    }

    Ok((input, left))
}

/// Parse an optional trailing offset (`K+273.15`)
fn offset(input: &str) -> IResult<&str, UnitExpr> {
    let (input, base) = multiplicative(input)?;

    if let Ok((input, (sign, value))) =
        pair(alt((ws(char('+')), ws(char('-')))), ws(offset_value)).parse(input)
    {
        let value = if sign == '-' { -value } else { value };
        Ok((input, UnitExpr::Offset(Box::new(base), value)))
    } else {
        Ok((input, base))
    }
}

/// Parse mixed-radix compounds (left-associative)
fn compound(input: &str) -> IResult<&str, UnitExpr> {
    let (mut input, mut high) = offset(input)?;

    while let Ok((new_input, _)) = ws(char(':')).parse(input) {
        let (new_input, low) = offset(new_input)?;
        input = new_input;
        high = UnitExpr::Compound(Box::new(high), Box::new(low));
    }

    Ok((input, high))
}

fn syntax_error(input: &str, remaining: &str) -> UnitParseError {
    UnitParseError::Syntax {
        input: input.to_string(),
        remaining: remaining.to_string(),
    }
}

/// Parses `input` as a whole, resolving symbols against `catalog`.
pub(crate) fn parse_unit(input: &str, catalog: &UnitCatalog) -> Result<Unit, UnitParseError> {
    if input.trim().is_empty() {
        return Err(UnitParseError::Empty);
    }
    let (remaining, expr) = ws(compound).parse(input).map_err(|e| match e {
        nom::Err::Error(e) | nom::Err::Failure(e) => syntax_error(input, e.input),
        nom::Err::Incomplete(_) => syntax_error(input, ""),
    })?;
    if !remaining.is_empty() {
        return Err(syntax_error(input, remaining));
    }
    expr.evaluate(catalog)
}
