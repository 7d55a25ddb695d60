//! Relay-style global object identifiers.
//!
//! A global ID is `base64("<TypeName>:<uuid>")`, so clients can tell object
//! types apart from the opaque ID alone.

use async_graphql::ID;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GlobalIdError {
    #[error("Couldn't resolve id: {0}.")]
    Malformed(String),
    #[error("Must receive a {expected} id.")]
    WrongType { expected: &'static str, found: String },
}

pub fn to_global_id(type_name: &str, id: Uuid) -> ID {
    ID(BASE64_STANDARD.encode(format!("{type_name}:{id}")))
}

/// Splits a global ID into its type name and database ID.
pub fn from_global_id(global_id: &str) -> Result<(String, Uuid), GlobalIdError> {
    let malformed = || GlobalIdError::Malformed(global_id.to_string());

    let decoded = BASE64_STANDARD
        .decode(global_id.trim().as_bytes())
        .map_err(|_| malformed())?;
    let decoded = String::from_utf8(decoded).map_err(|_| malformed())?;
    let (type_name, raw_id) = decoded.split_once(':').ok_or_else(malformed)?;
    if type_name.is_empty() {
        return Err(malformed());
    }
    let id = Uuid::parse_str(raw_id).map_err(|_| malformed())?;

    Ok((type_name.to_string(), id))
}

/// Decodes a global ID and checks that it points at `expected_type`.
pub fn resolve_global_id(global_id: &str, expected_type: &'static str) -> Result<Uuid, GlobalIdError> {
    let (type_name, id) = from_global_id(global_id)?;
    if type_name != expected_type {
        return Err(GlobalIdError::WrongType {
            expected: expected_type,
            found: type_name,
        });
    }
    Ok(id)
}
