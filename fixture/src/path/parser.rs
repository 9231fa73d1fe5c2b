//! nom grammar for path expressions
//!
//! ```text
//! expression := root | root? first rest*
//! root       := '$'
//! first      := name | index | '.' name
//! rest       := '.' name | index
//! name       := identifier | '*'
//! index      := '[' (digits | '*') ']'
//! ```
//! Whitespace is allowed between tokens.

use nom::branch::alt;
use nom::bytes::complete::take_while1;
use nom::character::complete::{char, digit1, multispace0};
use nom::combinator::{all_consuming, map, map_res, opt, value};
use nom::multi::many0;
use nom::sequence::{delimited, preceded};
use nom::{IResult, Parser};

use super::expression::Segment;

fn name(input: &str) -> IResult<&str, Segment> {
    alt((
        value(Segment::AnyName, char('*')),
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            |name: &str| Segment::Name(name.to_string()),
        ),
    ))
    .parse(input)
}

fn index(input: &str) -> IResult<&str, Segment> {
    delimited(
        (multispace0, char('['), multispace0),
        alt((
            value(Segment::AnyIndex, char('*')),
            map_res(digit1, |digits: &str| digits.parse::<usize>().map(Segment::Index)),
        )),
        (multispace0, char(']')),
    )
    .parse(input)
}

fn dotted_name(input: &str) -> IResult<&str, Segment> {
    preceded((multispace0, char('.'), multispace0), name).parse(input)
}

fn rest(input: &str) -> IResult<&str, Segment> {
    alt((dotted_name, index)).parse(input)
}

fn first(input: &str) -> IResult<&str, Segment> {
    alt((name, index, dotted_name)).parse(input)
}

fn expression(input: &str) -> IResult<&str, Vec<Segment>> {
    let (input, root) = opt(char('$')).parse(input)?;
    let (input, head) = if root.is_some() {
        opt(rest).parse(input)?
    } else {
        map(first, Some).parse(input)?
    };

    let Some(head) = head else {
        return Ok((input, Vec::new()));
    };

    let (input, tail) = many0(rest).parse(input)?;
    let mut segments = Vec::with_capacity(tail.len() + 1);
    segments.push(head);
    segments.extend(tail);
    Ok((input, segments))
}

/// Parse an expression into normalized segments; the root is the empty sequence
pub(super) fn parse_segments(input: &str) -> Result<Vec<Segment>, String> {
    all_consuming(delimited(multispace0, expression, multispace0))
        .parse(input)
        .map(|(_, segments)| segments)
        .map_err(|e| match e {
            nom::Err::Error(e) | nom::Err::Failure(e) if e.input.is_empty() => {
                "unexpected end of expression".to_string()
            }
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                format!("unexpected input at '{}'", e.input)
            }
            nom::Err::Incomplete(_) => "incomplete expression".to_string(),
        })
}
