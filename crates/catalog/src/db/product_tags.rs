use api_types::ProductTag;
use chrono::Utc;
use sqlx::{Executor, Sqlite};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum ProductTagError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct NewProductTag {
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    pub has_variants: bool,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductTagChanges {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub is_active: Option<bool>,
    pub has_variants: Option<bool>,
}

const PRODUCT_TAG_COLUMNS: &str =
    "id, name, slug, is_active, has_variants, created_at, updated_at";

pub struct ProductTagRepository;

impl ProductTagRepository {
    pub async fn find_by_id<'e, E>(executor: E, id: Uuid) -> Result<Option<ProductTag>, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, ProductTag>(&format!(
            "SELECT {PRODUCT_TAG_COLUMNS} FROM product_tags WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn find_by_slug<'e, E>(
        executor: E,
        slug: &str,
    ) -> Result<Option<ProductTag>, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, ProductTag>(&format!(
            "SELECT {PRODUCT_TAG_COLUMNS} FROM product_tags WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    pub async fn list<'e, E>(
        executor: E,
        include_inactive: bool,
        limit: i64,
    ) -> Result<Vec<ProductTag>, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let records = sqlx::query_as::<_, ProductTag>(&format!(
            r#"
            SELECT {PRODUCT_TAG_COLUMNS}
            FROM product_tags
            WHERE is_active = 1 OR $1
            ORDER BY name ASC, slug ASC
            LIMIT $2
            "#
        ))
        .bind(include_inactive)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn slug_exists<'e, E>(
        executor: E,
        slug: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM product_tags
                WHERE slug = $1 AND ($2 IS NULL OR id != $2)
            )
            "#,
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(executor)
        .await?;

        Ok(exists)
    }

    /// Slugs equal to `base` or starting with `base-`, other than the one owned by `exclude_id`.
    pub async fn slugs_with_prefix<'e, E>(
        executor: E,
        base: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<Vec<String>, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let slugs = sqlx::query_scalar::<_, String>(
            r#"
            SELECT slug FROM product_tags
            WHERE (slug = $1 OR substr(slug, 1, length($1) + 1) = $1 || '-')
              AND ($2 IS NULL OR id != $2)
            "#,
        )
        .bind(base)
        .bind(exclude_id)
        .fetch_all(executor)
        .await?;

        Ok(slugs)
    }

    pub async fn create<'e, E>(executor: E, tag: NewProductTag) -> Result<ProductTag, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let record = sqlx::query_as::<_, ProductTag>(&format!(
            r#"
            INSERT INTO product_tags (id, name, slug, is_active, has_variants, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING {PRODUCT_TAG_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(tag.name)
        .bind(tag.slug)
        .bind(tag.is_active)
        .bind(tag.has_variants)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(record)
    }

    pub async fn update<'e, E>(
        executor: E,
        id: Uuid,
        changes: ProductTagChanges,
    ) -> Result<Option<ProductTag>, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let record = sqlx::query_as::<_, ProductTag>(&format!(
            r#"
            UPDATE product_tags
            SET name         = COALESCE($2, name),
                slug         = COALESCE($3, slug),
                is_active    = COALESCE($4, is_active),
                has_variants = COALESCE($5, has_variants),
                updated_at   = $6
            WHERE id = $1
            RETURNING {PRODUCT_TAG_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(changes.name)
        .bind(changes.slug)
        .bind(changes.is_active)
        .bind(changes.has_variants)
        .bind(Utc::now())
        .fetch_optional(executor)
        .await?;

        Ok(record)
    }

    /// Returns `false` when no row matched.
    pub async fn delete<'e, E>(executor: E, id: Uuid) -> Result<bool, ProductTagError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("DELETE FROM product_tags WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
