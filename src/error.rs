use crate::json_selector::{JsonSelector, Selector, SelectorError};
use crate::kind::ValueKind;
use serde_json::Value;
use std::{fmt, io};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read input: {0}")]
    IoError(#[from] io::Error),
    #[error("failed to parse JSON: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),
    #[error(transparent)]
    SelectorError(#[from] SelectorError),
    #[error(transparent)]
    SubsetError(#[from] SubsetError),
}

/// Why a value failed to be a subset of another.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SubsetErrorKind {
    #[error("type mismatch: {expected} != {actual}")]
    TypeMismatch {
        expected: ValueKind,
        actual: ValueKind,
    },
    #[error("key is missing from map: {0}")]
    MissingKey(String),
    #[error("expected length longer than actual: {expected} > {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("no unmatched element in actual satisfies expected element {index}")]
    ElementNotFound { index: usize },
    #[error("value mismatch, expected: {expected} != actual: {actual}")]
    ValueMismatch { expected: Value, actual: Value },
}

/// The first mismatch found while checking that one value is a subset of
/// another.
///
/// `path` points at the location of the mismatch inside `expected`, in
/// document order. A failed sequence match also carries the failure of the
/// unmatched element against the first candidate it was tried with, which is
/// exposed through [`SubsetError::cause`] and [`std::error::Error::source`].
/// Cause paths are also rooted at `expected`, so every pointer in the chain
/// resolves against the same document.
#[derive(Clone, Debug, PartialEq)]
pub struct SubsetError {
    kind: SubsetErrorKind,
    path: Vec<Selector>,
    cause: Option<Box<SubsetError>>,
}

impl SubsetError {
    pub fn new(kind: SubsetErrorKind) -> Self {
        SubsetError {
            kind,
            path: vec![],
            cause: None,
        }
    }

    pub(crate) fn caused_by(mut self, cause: SubsetError) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    /// Places this error one level deeper, beneath `parent`.
    pub(crate) fn within(mut self, parent: Selector) -> Self {
        self.path.insert(0, parent.clone());
        self.cause = self.cause.map(|cause| Box::new(cause.within(parent)));
        self
    }

    pub fn kind(&self) -> &SubsetErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn path(&self) -> JsonSelector {
        JsonSelector::from_path(&self.path)
    }

    pub fn cause(&self) -> Option<&SubsetError> {
        self.cause.as_deref()
    }
}

impl fmt::Display for SubsetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.kind)?;
        } else {
            write!(f, "{}: {}", self.path(), self.kind)?;
        }

        if f.alternate() {
            if let Some(cause) = &self.cause {
                write!(f, "; caused by: {:#}", cause)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for SubsetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
