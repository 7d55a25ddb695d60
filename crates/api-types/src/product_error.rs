use async_graphql::{Enum, SimpleObject};
use strum_macros::Display;

/// Machine-readable codes reported in `productErrors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Enum, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductErrorCode {
    GraphqlError,
    Invalid,
    NotFound,
    Required,
    Unique,
}

#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
pub struct ProductError {
    /// Name of a field that caused the error. A value of `null` indicates that the
    /// error isn't associated with a particular field.
    pub field: Option<String>,
    /// The error message.
    pub message: Option<String>,
    /// The error code.
    pub code: ProductErrorCode,
}

impl ProductError {
    pub fn new(field: impl Into<String>, code: ProductErrorCode, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: Some(message.into()),
            code,
        }
    }
}
