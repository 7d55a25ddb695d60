//! Slug helpers: normalization of human-readable names and collision-free
//! generation against the `product_tags` table.

use api_types::PRODUCT_TAG_SLUG_MAX_LENGTH;
use sqlx::SqliteConnection;
use uuid::Uuid;

use crate::db::product_tags::{ProductTagError, ProductTagRepository};

// Leaves room for a "-N" collision suffix.
const MAX_BASE_SLUG_LENGTH: usize = PRODUCT_TAG_SLUG_MAX_LENGTH - 8;

/// Transliterates `value` to ASCII and joins its alphanumeric runs with hyphens.
pub fn slugify(value: &str) -> String {
    let slug = ::slug::slugify(value);
    if slug.len() <= MAX_BASE_SLUG_LENGTH {
        return slug;
    }
    slug[..MAX_BASE_SLUG_LENGTH].trim_end_matches('-').to_string()
}

/// Letters, digits, underscores and hyphens only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= PRODUCT_TAG_SLUG_MAX_LENGTH
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Picks `base`, or the first free `base-N` (N >= 2) given the slugs already in use.
pub fn prepare_unique_slug<S: AsRef<str>>(base: &str, taken: &[S]) -> String {
    let is_taken = |candidate: &str| taken.iter().any(|slug| slug.as_ref() == candidate);

    let mut candidate = base.to_string();
    let mut extension = 1;
    while is_taken(&candidate) {
        extension += 1;
        candidate = format!("{base}-{extension}");
    }
    candidate
}

/// Slugifies `value` and resolves collisions with other product tags.
///
/// Returns `None` when `value` has nothing to build a slug from.
pub async fn generate_unique_slug(
    conn: &mut SqliteConnection,
    value: &str,
    exclude_id: Option<Uuid>,
) -> Result<Option<String>, ProductTagError> {
    let base = slugify(value);
    if base.is_empty() {
        return Ok(None);
    }

    let taken = ProductTagRepository::slugs_with_prefix(&mut *conn, &base, exclude_id).await?;
    Ok(Some(prepare_unique_slug(&base, &taken)))
}
