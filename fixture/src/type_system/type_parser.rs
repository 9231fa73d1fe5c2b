//! Parser for type names with support for nested generics
//!
//! This module uses nom to parse type names like:
//! - `i32`
//! - `demo::Order`
//! - `Vec<demo::Item>`
//! - `std::collections::HashMap<String, Option<Vec<u8>>>`

use std::collections::HashMap;
use std::fmt::Display;

use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::{char, multispace0};
use nom::combinator::{all_consuming, opt, recognize};
use nom::multi::separated_list1;
use nom::sequence::{delimited, pair};
use nom::{IResult, Parser};

use crate::error::{Error, Result};

/// A parsed type name: the base path plus its generic arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParsedTypeName {
    /// Module path and type, e.g. `std::collections::HashMap`
    pub base:      String,
    /// Generic arguments in declaration order
    pub arguments: Vec<Self>,
}

impl ParsedTypeName {
    /// Create a parsed name without generic arguments
    pub fn plain(base: impl Into<String>) -> Self {
        Self {
            base:      base.into(),
            arguments: Vec::new(),
        }
    }

    /// Replace generic parameters (bare names such as `T`) with their bound arguments
    #[must_use]
    pub fn substitute(&self, bindings: &HashMap<String, Self>) -> Self {
        if self.arguments.is_empty()
            && let Some(bound) = bindings.get(&self.base)
        {
            return bound.clone();
        }
        Self {
            base:      self.base.clone(),
            arguments: self
                .arguments
                .iter()
                .map(|argument| argument.substitute(bindings))
                .collect(),
        }
    }

    /// Last path segment of the base
    pub fn short_base(&self) -> &str {
        self.base.rsplit("::").next().unwrap_or(&self.base)
    }
}

impl Display for ParsedTypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.base)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (index, argument) in self.arguments.iter().enumerate() {
                if index > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{argument}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Parse an identifier (alphanumeric + underscore)
fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '_')(input)
}

/// Parse a module path with an optional leading reference marker (`&str`)
fn type_path(input: &str) -> IResult<&str, &str> {
    recognize(pair(opt(char('&')), separated_list1(tag("::"), identifier))).parse(input)
}

/// Parse generic arguments recursively
fn generic_arguments(input: &str) -> IResult<&str, Vec<ParsedTypeName>> {
    delimited(
        (multispace0, char('<'), multispace0),
        separated_list1((multispace0, char(','), multispace0), parsed_type),
        (multispace0, char('>')),
    )
    .parse(input)
}

fn parsed_type(input: &str) -> IResult<&str, ParsedTypeName> {
    let (input, base) = type_path(input)?;
    let (input, arguments) = opt(generic_arguments).parse(input)?;
    Ok((
        input,
        ParsedTypeName {
            base:      base.to_string(),
            arguments: arguments.unwrap_or_default(),
        },
    ))
}

/// Parse a complete type name, rejecting trailing input
pub fn parse_type_name(input: &str) -> Result<ParsedTypeName> {
    all_consuming(delimited(multispace0, parsed_type, multispace0))
        .parse(input)
        .map(|(_, parsed)| parsed)
        .map_err(|e| Error::invalid("type name", format!("'{input}' ({e})")).into())
}
