//! Error types of the crate.

use thiserror::Error;

/// Errors raised by [`Node`](crate::Node) and [`NodeList`](crate::NodeList)
/// operations.
///
/// Ordinary "not found" conditions are not errors: lookups return `None`
/// and value-keyed removal returns `false`. These variants are reserved for
/// arguments that break the contract of an operation.
#[non_exhaustive]
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// A disallowed value was passed to a constructor or a setter.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A positional operation was given an index outside the list.
    #[error("index {index} is out of bounds for a list of length {len}")]
    IndexOutOfBounds { index: isize, len: usize },

    /// A node attribute that does not exist was requested.
    #[error("undefined node attribute `{name}`")]
    UndefinedAttribute { name: String },

    /// Encoding a list into its serialized form failed.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

impl Error {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Error::InvalidArgument(reason.into())
    }

    /// Check if this error reports an access beyond a defined range,
    /// either a list index or a node attribute.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            Error::IndexOutOfBounds { .. } | Error::UndefinedAttribute { .. }
        )
    }

    /// Check if this error reports a rejected argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument(_))
    }
}

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
