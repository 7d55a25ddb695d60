//! API types shared between the catalog server and its clients.
//!
//! This crate contains:
//! - Row types (e.g., `ProductTag`) - the GraphQL representation of database entities
//! - Input types (e.g., `ProductTagInput`) - mutation arguments
//! - Error types surfaced in mutation payloads (e.g., `ProductError`)
//! - Relay-style global ID encoding

pub mod global_id;
pub mod product_error;
pub mod product_tag;

pub use global_id::*;
pub use product_error::*;
pub use product_tag::*;
