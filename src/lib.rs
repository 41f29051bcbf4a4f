//! Structural subset checks for JSON-like documents.
//!
//! [`is_subset`] asserts that one document contains at least the fields and
//! values of another, which is what a test usually wants to say about a
//! serialized resource: these fields must be there, anything else may be.

pub mod error;
pub mod json_selector;
mod kind;
mod subset;

pub use error::{Error, SubsetError, SubsetErrorKind};
pub use json_selector::{value_at, JsonSelector, Selector, SelectorError};
pub use kind::{scalars_equal, Shape, ValueKind};
pub use subset::is_subset;

use serde::Serialize;

/// Serializes both sides to JSON values and checks that `expected` is a
/// subset of `actual`.
///
/// Fields serialized as `null` on the expected side are compared like any
/// other value, so optional fields that should be ignored need
/// `#[serde(skip_serializing_if = "Option::is_none")]`.
pub fn is_subset_of<E, A>(expected: &E, actual: &A) -> Result<(), Error>
where
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    let expected = serde_json::to_value(expected)?;
    let actual = serde_json::to_value(actual)?;

    is_subset(&expected, &actual).map_err(Error::from)
}
