use api_types::{GlobalIdError, ProductError, ProductErrorCode};
use async_graphql::{Error, ErrorExtensions};
use thiserror::Error;

use crate::db::{is_unique_violation, product_tags::ProductTagError};

/// Failure of a product tag mutation.
///
/// `Invalid` ends up in the payload's `productErrors`; `Database` becomes a
/// top-level GraphQL error.
#[derive(Debug, Error)]
pub enum MutationError {
    #[error("invalid input: {0:?}")]
    Invalid(Vec<ProductError>),
    #[error(transparent)]
    Database(#[from] ProductTagError),
}

impl MutationError {
    pub fn field(field: &str, code: ProductErrorCode, message: impl Into<String>) -> Self {
        Self::Invalid(vec![ProductError::new(field, code, message)])
    }

    pub fn invalid_id(error: GlobalIdError) -> Self {
        Self::field("id", ProductErrorCode::GraphqlError, error.to_string())
    }

    pub fn not_found(id: &str) -> Self {
        Self::field(
            "id",
            ProductErrorCode::NotFound,
            format!("Couldn't resolve to a node: {id}"),
        )
    }

    pub fn duplicate_slug() -> Self {
        Self::field(
            "slug",
            ProductErrorCode::Unique,
            "Product tag with this Slug already exists.",
        )
    }

    /// Unique violations raised by the database mean another writer took the slug first.
    pub fn from_write(error: ProductTagError) -> Self {
        if is_unique_violation(&error) {
            Self::duplicate_slug()
        } else {
            Self::Database(error)
        }
    }
}

impl From<sqlx::Error> for MutationError {
    fn from(error: sqlx::Error) -> Self {
        Self::from_write(ProductTagError::Database(error))
    }
}

pub(crate) fn internal_error(error: &(dyn std::error::Error + 'static), message: &str) -> Error {
    tracing::error!(error = %error, "{message}");
    Error::new(message).extend_with(|_, e| e.set("code", "INTERNAL_ERROR"))
}

pub(crate) fn bad_request(message: impl Into<String>) -> Error {
    Error::new(message).extend_with(|_, e| e.set("code", "GRAPHQL_ERROR"))
}
