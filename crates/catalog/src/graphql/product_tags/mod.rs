mod clean;
mod mutations;

use api_types::{PRODUCT_TAG_TYPE, ProductTag, resolve_global_id};
use async_graphql::{Context, ID, Object, Result};
use sqlx::SqlitePool;

pub use mutations::{ProductTagCreate, ProductTagDelete, ProductTagMutation, ProductTagUpdate};

use crate::{
    auth::{Permission, RequestContext},
    db::product_tags::ProductTagRepository,
    graphql::error::{bad_request, internal_error},
};

const DEFAULT_PAGE_SIZE: i32 = 100;

#[derive(Default)]
pub struct ProductTagQuery;

#[Object]
impl ProductTagQuery {
    /// Look up a product tag by ID or slug.
    async fn product_tag(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "ID of the product tag.")] id: Option<ID>,
        #[graphql(desc = "Slug of the product tag.")] slug: Option<String>,
    ) -> Result<Option<ProductTag>> {
        let pool = ctx.data::<SqlitePool>()?;

        let found = match (id, slug) {
            (Some(id), None) => {
                let tag_id = resolve_global_id(&id, PRODUCT_TAG_TYPE)
                    .map_err(|error| bad_request(error.to_string()))?;
                ProductTagRepository::find_by_id(pool, tag_id).await
            }
            (None, Some(slug)) => ProductTagRepository::find_by_slug(pool, &slug).await,
            (Some(_), Some(_)) => {
                return Err(bad_request("Argument 'id' cannot be combined with 'slug'."));
            }
            (None, None) => return Err(bad_request("Argument 'id' or 'slug' is required.")),
        }
        .map_err(|error| internal_error(&error, "failed to load product tag"))?;

        let can_see_inactive = can_manage_products(ctx);
        Ok(found.filter(|tag| tag.is_active || can_see_inactive))
    }

    /// List product tags ordered by name. Inactive tags are visible to staff only.
    async fn product_tags(
        &self,
        ctx: &Context<'_>,
        #[graphql(desc = "Return the first n elements (1-100).")] first: Option<i32>,
    ) -> Result<Vec<ProductTag>> {
        let pool = ctx.data::<SqlitePool>()?;
        let limit = first.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, DEFAULT_PAGE_SIZE);

        ProductTagRepository::list(pool, can_manage_products(ctx), i64::from(limit))
            .await
            .map_err(|error| internal_error(&error, "failed to list product tags"))
    }
}

fn can_manage_products(ctx: &Context<'_>) -> bool {
    ctx.data_opt::<RequestContext>()
        .is_some_and(|request_ctx| request_ctx.has_permission(Permission::ManageProducts))
}
