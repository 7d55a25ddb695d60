use async_graphql::{ComplexObject, ID, InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::to_global_id;

/// GraphQL type name, also the prefix of product tag global IDs.
pub const PRODUCT_TAG_TYPE: &str = "ProductTag";

pub const PRODUCT_TAG_NAME_MAX_LENGTH: usize = 250;
pub const PRODUCT_TAG_SLUG_MAX_LENGTH: usize = 255;

#[derive(Debug, Clone, sqlx::FromRow, SimpleObject)]
#[graphql(complex)]
pub struct ProductTag {
    #[graphql(skip)]
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub is_active: bool,
    /// Whether products of this tag have multiple variants.
    pub has_variants: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[ComplexObject]
impl ProductTag {
    async fn id(&self) -> ID {
        to_global_id(PRODUCT_TAG_TYPE, self.id)
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct ProductTagInput {
    /// Name of the product tag.
    pub name: Option<String>,
    /// Product tag slug. Generated from the name when omitted or blank.
    pub slug: MaybeUndefined<String>,
    /// Determines if the product tag is active.
    pub is_active: Option<bool>,
    /// Determines if products of this tag have multiple variants. This option
    /// mainly simplifies product management in the dashboard. There is always at
    /// least one variant created under the hood.
    pub has_variants: Option<bool>,
}
