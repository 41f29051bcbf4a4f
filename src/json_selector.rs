//! RFC 6901 JSON Pointers, used both to locate subset failures and to pick
//! the subtrees a comparison starts from.
//!
//! One extension: a `-` segment selects the last element of an array. RFC 6901
//! reserves `-` for the position past the end, which is only meaningful when
//! adding elements.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_till1},
    character::complete::digit1,
    combinator::{all_consuming, eof, map, map_res, peek, recognize, verify},
    multi::separated_list1,
    sequence::{preceded, terminated},
    IResult,
};
use serde_json::Value;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Selector {
    ArrayIndex(usize),
    LastElementInArray,
    Key(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JsonSelector {
    FullDocument,
    JsonSelector(Vec<Selector>),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SelectorError {
    #[error("invalid JSON pointer: {0:?}")]
    Invalid(String),
    #[error("no value found at JSON pointer {0:?}")]
    NotFound(String),
}

impl JsonSelector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        all_consuming(parse)(input)
            .map(|(_, selector)| selector)
            .map_err(|_| SelectorError::Invalid(input.to_string()))
    }

    pub(crate) fn from_path(path: &[Selector]) -> Self {
        if path.is_empty() {
            JsonSelector::FullDocument
        } else {
            JsonSelector::JsonSelector(path.to_vec())
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::ArrayIndex(idx) => write!(f, "{}", idx),
            Selector::LastElementInArray => f.write_str("-"),
            Selector::Key(key) => f.write_str(&key.replace('~', "~0").replace('/', "~1")),
        }
    }
}

impl fmt::Display for JsonSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonSelector::FullDocument => Ok(()),
            JsonSelector::JsonSelector(values) => {
                for value in values {
                    write!(f, "/{}", value)?;
                }
                Ok(())
            }
        }
    }
}

fn parse(input: &str) -> IResult<&str, JsonSelector> {
    alt((
        parse_full_document,
        map(
            preceded(
                tag("/"),
                separated_list1(tag("/"), alt((parse_array_index, to_next_component))),
            ),
            JsonSelector::JsonSelector,
        ),
    ))(input)
}

fn parse_full_document(input: &str) -> IResult<&str, JsonSelector> {
    map(eof, |_| JsonSelector::FullDocument)(input)
}

fn to_next_component(input: &str) -> IResult<&str, Selector> {
    alt((
        map(take_till1(|c| c == '/'), |v: &str| {
            Selector::Key(v.replace("~1", "/").replace("~0", "~"))
        }),
        map(tag(""), |_| Selector::Key("".to_string())),
    ))(input)
}

// An index only counts as one when it fills the whole segment; "01" and "-x"
// are plain keys.
fn parse_array_index(input: &str) -> IResult<&str, Selector> {
    terminated(
        alt((
            map(tag("-"), |_| Selector::LastElementInArray),
            map(parse_usize, Selector::ArrayIndex),
        )),
        end_of_segment,
    )(input)
}

fn parse_usize(input: &str) -> IResult<&str, usize> {
    map_res(
        verify(recognize(digit1), |digits: &str| {
            digits == "0" || !digits.starts_with('0')
        }),
        str::parse,
    )(input)
}

fn end_of_segment(input: &str) -> IResult<&str, &str> {
    peek(alt((tag("/"), eof)))(input)
}

pub fn value_at<'a>(document: &'a Value, selector: &str) -> Result<&'a Value, SelectorError> {
    match JsonSelector::parse(selector)? {
        JsonSelector::FullDocument => Ok(document),
        JsonSelector::JsonSelector(values) => value_at_selector(document, &values)
            .ok_or_else(|| SelectorError::NotFound(selector.to_string())),
    }
}

fn value_at_selector<'a>(document: &'a Value, selectors: &[Selector]) -> Option<&'a Value> {
    match selectors.split_first() {
        None => Some(document),
        Some((current_key, rest)) => {
            let next = match (document, current_key) {
                (Value::Array(array_value), Selector::ArrayIndex(idx)) => array_value.get(*idx),
                (Value::Array(array_value), Selector::LastElementInArray) => array_value.last(),
                (Value::Object(dict), Selector::Key(key)) => dict.get(key),
                (Value::Object(dict), Selector::ArrayIndex(idx)) => dict.get(&idx.to_string()),
                (Value::Object(dict), Selector::LastElementInArray) => dict.get("-"),
                (_, _) => None,
            }?;
            value_at_selector(next, rest)
        }
    }
}
