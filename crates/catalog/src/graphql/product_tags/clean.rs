use api_types::{
    PRODUCT_TAG_NAME_MAX_LENGTH, ProductErrorCode, ProductTag, ProductTagInput,
};
use async_graphql::MaybeUndefined;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::{
    db::product_tags::{NewProductTag, ProductTagChanges, ProductTagRepository},
    graphql::error::MutationError,
    slug::{generate_unique_slug, is_valid_slug},
};

const DEFAULT_IS_ACTIVE: bool = true;
const DEFAULT_HAS_VARIANTS: bool = true;

pub(crate) async fn clean_create_input(
    conn: &mut SqliteConnection,
    input: ProductTagInput,
) -> Result<NewProductTag, MutationError> {
    let slug = clean_slug(conn, None, input.name.as_deref(), input.slug)
        .await?
        .ok_or_else(blank_slug)?;

    let name = match input.name {
        Some(name) => clean_name(name)?,
        None => return Err(blank_name()),
    };

    Ok(NewProductTag {
        name,
        slug,
        is_active: input.is_active.unwrap_or(DEFAULT_IS_ACTIVE),
        has_variants: input.has_variants.unwrap_or(DEFAULT_HAS_VARIANTS),
    })
}

/// Omitted fields keep their stored values. An explicit `null` or blank slug
/// is regenerated from `name` the same way create does, and fails with
/// `REQUIRED` when the input carries no usable name.
pub(crate) async fn clean_update_input(
    conn: &mut SqliteConnection,
    instance: &ProductTag,
    input: ProductTagInput,
) -> Result<ProductTagChanges, MutationError> {
    let slug = clean_slug(conn, Some(instance.id), input.name.as_deref(), input.slug).await?;
    let name = input.name.map(clean_name).transpose()?;

    Ok(ProductTagChanges {
        name,
        slug,
        is_active: input.is_active,
        has_variants: input.has_variants,
    })
}

/// Validates an explicit slug or derives one from `name`.
///
/// Returns `None` only for an existing tag whose input leaves the slug out,
/// meaning the stored slug is kept.
async fn clean_slug(
    conn: &mut SqliteConnection,
    instance_id: Option<Uuid>,
    name: Option<&str>,
    slug: MaybeUndefined<String>,
) -> Result<Option<String>, MutationError> {
    let explicit = match slug {
        MaybeUndefined::Value(slug) if !slug.trim().is_empty() => Some(slug.trim().to_string()),
        MaybeUndefined::Undefined if instance_id.is_some() => return Ok(None),
        _ => None,
    };

    if let Some(slug) = explicit {
        if !is_valid_slug(&slug) {
            return Err(MutationError::field(
                "slug",
                ProductErrorCode::Invalid,
                "Enter a valid slug consisting of letters, numbers, underscores or hyphens.",
            ));
        }
        if ProductTagRepository::slug_exists(&mut *conn, &slug, instance_id).await? {
            return Err(MutationError::duplicate_slug());
        }
        return Ok(Some(slug));
    }

    let Some(name) = name.map(str::trim).filter(|name| !name.is_empty()) else {
        return Err(blank_slug());
    };

    match generate_unique_slug(conn, name, instance_id).await? {
        Some(slug) => Ok(Some(slug)),
        None => Err(blank_slug()),
    }
}

fn clean_name(name: String) -> Result<String, MutationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(blank_name());
    }
    if name.chars().count() > PRODUCT_TAG_NAME_MAX_LENGTH {
        return Err(MutationError::field(
            "name",
            ProductErrorCode::Invalid,
            format!("Ensure this value has at most {PRODUCT_TAG_NAME_MAX_LENGTH} characters."),
        ));
    }
    Ok(name.to_string())
}

fn blank_slug() -> MutationError {
    MutationError::field("slug", ProductErrorCode::Required, "Slug value cannot be blank.")
}

fn blank_name() -> MutationError {
    MutationError::field("name", ProductErrorCode::Required, "This field cannot be blank.")
}
