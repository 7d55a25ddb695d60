//! GraphQL schema of the catalog service.

pub mod error;
pub mod guard;
pub mod product_tags;

use async_graphql::{EmptySubscription, MergedObject, Schema};
use sqlx::SqlitePool;

use product_tags::{ProductTagMutation, ProductTagQuery};

#[derive(MergedObject, Default)]
pub struct QueryRoot(ProductTagQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(ProductTagMutation);

pub type CatalogSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Builds the schema; per-request identity is attached as a
/// [`RequestContext`](crate::auth::RequestContext) on each request.
pub fn build_schema(pool: SqlitePool) -> CatalogSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(pool)
        .finish()
}
