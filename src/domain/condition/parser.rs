//! Nom parser for condition expressions.
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparison, operand.

use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_until},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace0},
    combinator::{all_consuming, map, opt, recognize},
    multi::{fold_many0, many0, many0_count},
    sequence::{delimited, pair, preceded, tuple},
};
use serde_json::{Number, Value};

use super::{ConditionError, Expr};

const RESERVED: [&str; 10] =
    ["and", "or", "not", "true", "false", "none", "True", "False", "None", "null"];

pub(super) fn parse(source: &str) -> Result<Expr, ConditionError> {
    match all_consuming(ws(or_expr))(source) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(err)) | Err(nom::Err::Failure(err)) => {
            let offset = source.len() - err.input.len();
            let message = if err.input.is_empty() {
                "unexpected end of expression".to_string()
            } else {
                format!("unexpected input '{}'", snippet(err.input))
            };
            Err(ConditionError::Syntax { offset, message })
        }
        Err(nom::Err::Incomplete(_)) => Err(ConditionError::Syntax {
            offset: source.len(),
            message: "unexpected end of expression".to_string(),
        }),
    }
}

fn snippet(input: &str) -> String {
    input.chars().take(16).collect()
}

/// Surround a parser with optional whitespace.
fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn or_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input)?;
    fold_many0(
        preceded(keyword("or"), and_expr),
        move || first.clone(),
        |lhs, rhs| Expr::Or(Box::new(lhs), Box::new(rhs)),
    )(input)
}

fn and_expr(input: &str) -> IResult<&str, Expr> {
    let (input, first) = not_expr(input)?;
    fold_many0(
        preceded(keyword("and"), not_expr),
        move || first.clone(),
        |lhs, rhs| Expr::And(Box::new(lhs), Box::new(rhs)),
    )(input)
}

fn not_expr(input: &str) -> IResult<&str, Expr> {
    alt((
        map(preceded(keyword("not"), not_expr), |inner| Expr::Not(Box::new(inner))),
        comparison,
    ))(input)
}

fn comparison(input: &str) -> IResult<&str, Expr> {
    let (input, lhs) = operand(input)?;
    let (input, rhs) = opt(pair(ws(alt((tag("=="), tag("!=")))), operand))(input)?;
    let expr = match rhs {
        Some(("==", rhs)) => Expr::Eq(Box::new(lhs), Box::new(rhs)),
        Some((_, rhs)) => Expr::Ne(Box::new(lhs), Box::new(rhs)),
        None => lhs,
    };
    Ok((input, expr))
}

fn operand(input: &str) -> IResult<&str, Expr> {
    ws(alt((
        delimited(char('('), ws(or_expr), char(')')),
        map(quoted_string, |text| Expr::Literal(Value::String(text.to_string()))),
        map(number, Expr::Literal),
        map(constant, Expr::Literal),
        path,
    )))(input)
}

/// Match a whole word equal to `word`, so `order` never matches `or`.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        let (rest, found) = ws(identifier)(input)?;
        if found == word {
            Ok((rest, found))
        } else {
            Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))
        }
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alt((alpha1, tag("_"))), many0_count(alt((alphanumeric1, tag("_"))))))(input)
}

fn quoted_string(input: &str) -> IResult<&str, &str> {
    alt((
        delimited(char('"'), take_until("\""), char('"')),
        delimited(char('\''), take_until("'"), char('\'')),
    ))(input)
}

fn number(input: &str) -> IResult<&str, Value> {
    let (rest, text) =
        recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1)))))(input)?;
    let value = match text.parse::<i64>() {
        Ok(int) => Value::from(int),
        Err(_) => match text.parse::<f64>().ok().and_then(Number::from_f64) {
            Some(float) => Value::Number(float),
            None => {
                return Err(nom::Err::Error(nom::error::Error::new(
                    input,
                    nom::error::ErrorKind::Float,
                )));
            }
        },
    };
    Ok((rest, value))
}

fn constant(input: &str) -> IResult<&str, Value> {
    let (rest, word) = identifier(input)?;
    let value = match word {
        "true" | "True" => Value::Bool(true),
        "false" | "False" => Value::Bool(false),
        "none" | "None" | "null" => Value::Null,
        _ => {
            return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
        }
    };
    Ok((rest, value))
}

fn path(input: &str) -> IResult<&str, Expr> {
    let (rest, (root, attrs)) = pair(identifier, many0(preceded(char('.'), identifier)))(input)?;
    if RESERVED.contains(&root) {
        return Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)));
    }
    let mut segments = vec![root.to_string()];
    segments.extend(attrs.into_iter().map(str::to_string));
    Ok((rest, Expr::Path(segments)))
}
