use api_types::{PRODUCT_TAG_TYPE, ProductError, ProductTag, ProductTagInput, resolve_global_id};
use async_graphql::{Context, ID, Object, Result, SimpleObject};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use tracing::instrument;

use super::clean::{clean_create_input, clean_update_input};
use crate::{
    auth::Permission,
    db::product_tags::ProductTagRepository,
    graphql::{
        error::{MutationError, internal_error},
        guard::PermissionGuard,
    },
};

/// Creates a new product tag.
#[derive(Debug, SimpleObject)]
pub struct ProductTagCreate {
    pub product_errors: Vec<ProductError>,
    pub errors: Vec<ProductError>,
    pub product_tag: Option<ProductTag>,
}

/// Updates an existing product tag.
#[derive(Debug, SimpleObject)]
pub struct ProductTagUpdate {
    pub product_errors: Vec<ProductError>,
    pub errors: Vec<ProductError>,
    pub product_tag: Option<ProductTag>,
}

/// Deletes a product tag.
#[derive(Debug, SimpleObject)]
pub struct ProductTagDelete {
    pub product_errors: Vec<ProductError>,
    pub errors: Vec<ProductError>,
    pub product_tag: Option<ProductTag>,
}

/// Splits a mutation result into payload parts, or a top-level error for
/// failures the client cannot fix.
fn payload_parts(
    result: Result<ProductTag, MutationError>,
    failure_message: &str,
) -> Result<(Option<ProductTag>, Vec<ProductError>)> {
    match result {
        Ok(product_tag) => Ok((Some(product_tag), Vec::new())),
        Err(MutationError::Invalid(errors)) => Ok((None, errors)),
        Err(MutationError::Database(error)) => Err(internal_error(&error, failure_message)),
    }
}

macro_rules! impl_payload_from_parts {
    ($($payload:ident),+) => {
        $(
            impl $payload {
                fn from_result(
                    result: Result<ProductTag, MutationError>,
                    failure_message: &str,
                ) -> Result<Option<Self>> {
                    let (product_tag, errors) = payload_parts(result, failure_message)?;
                    Ok(Some(Self {
                        product_errors: errors.clone(),
                        errors,
                        product_tag,
                    }))
                }
            }
        )+
    };
}

impl_payload_from_parts!(ProductTagCreate, ProductTagUpdate, ProductTagDelete);

#[derive(Default)]
pub struct ProductTagMutation;

#[Object]
impl ProductTagMutation {
    /// Creates a new product tag.
    #[graphql(guard = "PermissionGuard::new(Permission::ManageProducts)")]
    async fn product_tag_create(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Fields required to create a product tag.")] input: ProductTagInput,
    ) -> Result<Option<ProductTagCreate>> {
        let pool = ctx.data::<SqlitePool>()?;
        ProductTagCreate::from_result(
            create_product_tag(pool, input).await,
            "failed to create product tag",
        )
    }

    /// Updates an existing product tag.
    #[graphql(guard = "PermissionGuard::new(Permission::ManageProducts)")]
    async fn product_tag_update(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of a product tag to update.")] id: ID,
        #[graphql(desc = "Fields required to update a product tag.")] input: ProductTagInput,
    ) -> Result<Option<ProductTagUpdate>> {
        let pool = ctx.data::<SqlitePool>()?;
        ProductTagUpdate::from_result(
            update_product_tag(pool, &id, input).await,
            "failed to update product tag",
        )
    }

    /// Deletes a product tag.
    #[graphql(guard = "PermissionGuard::new(Permission::ManageProducts)")]
    async fn product_tag_delete(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of a product tag to delete.")] id: ID,
    ) -> Result<Option<ProductTagDelete>> {
        let pool = ctx.data::<SqlitePool>()?;
        ProductTagDelete::from_result(
            delete_product_tag(pool, &id).await,
            "failed to delete product tag",
        )
    }
}

#[instrument(name = "product_tags.create", skip_all, fields(name = ?input.name))]
async fn create_product_tag(
    pool: &SqlitePool,
    input: ProductTagInput,
) -> Result<ProductTag, MutationError> {
    let mut tx = begin_write(pool).await?;

    let new_tag = clean_create_input(&mut tx, input).await?;
    let product_tag = ProductTagRepository::create(&mut *tx, new_tag)
        .await
        .map_err(MutationError::from_write)?;

    tx.commit().await?;

    tracing::info!(product_tag_id = %product_tag.id, slug = %product_tag.slug, "product tag created");
    Ok(product_tag)
}

#[instrument(name = "product_tags.update", skip_all, fields(id = %id.as_str()))]
async fn update_product_tag(
    pool: &SqlitePool,
    id: &ID,
    input: ProductTagInput,
) -> Result<ProductTag, MutationError> {
    let mut tx = begin_write(pool).await?;

    let instance = get_node_or_error(&mut tx, id).await?;
    let changes = clean_update_input(&mut tx, &instance, input).await?;
    let product_tag = ProductTagRepository::update(&mut *tx, instance.id, changes)
        .await
        .map_err(MutationError::from_write)?
        .ok_or_else(|| MutationError::not_found(id))?;

    tx.commit().await?;

    tracing::info!(product_tag_id = %product_tag.id, slug = %product_tag.slug, "product tag updated");
    Ok(product_tag)
}

#[instrument(name = "product_tags.delete", skip_all, fields(id = %id.as_str()))]
async fn delete_product_tag(pool: &SqlitePool, id: &ID) -> Result<ProductTag, MutationError> {
    let mut tx = begin_write(pool).await?;

    let instance = get_node_or_error(&mut tx, id).await?;
    if !ProductTagRepository::delete(&mut *tx, instance.id).await? {
        return Err(MutationError::not_found(id));
    }

    tx.commit().await?;

    tracing::info!(product_tag_id = %instance.id, slug = %instance.slug, "product tag deleted");
    Ok(instance)
}

/// Takes the write lock up front so the read-then-write sequence cannot fail
/// with `SQLITE_BUSY` while upgrading a deferred transaction.
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

async fn get_node_or_error(conn: &mut SqliteConnection, id: &ID) -> Result<ProductTag, MutationError> {
    let tag_id = resolve_global_id(id, PRODUCT_TAG_TYPE).map_err(MutationError::invalid_id)?;

    ProductTagRepository::find_by_id(&mut *conn, tag_id)
        .await?
        .ok_or_else(|| MutationError::not_found(id))
}
