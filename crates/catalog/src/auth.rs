use std::{collections::HashSet, str::FromStr};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

use crate::{AppState, config::AuthConfig, routes::error::ErrorResponse};

/// Staff permissions carried in access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Permission {
    ManageProducts,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub sub: Uuid,
    pub exp: i64,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header must use the Bearer scheme")]
    InvalidScheme,
    #[error("invalid access token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
}

#[derive(Debug, Clone)]
pub struct Requester {
    pub user_id: Uuid,
    pub permissions: HashSet<Permission>,
}

/// Identity attached to every request; anonymous when no bearer token was sent.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub requester: Option<Requester>,
}

impl RequestContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn staff(user_id: Uuid, permissions: impl IntoIterator<Item = Permission>) -> Self {
        Self {
            requester: Some(Requester {
                user_id,
                permissions: permissions.into_iter().collect(),
            }),
        }
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.requester
            .as_ref()
            .is_some_and(|requester| requester.permissions.contains(&permission))
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.requester.as_ref().map(|requester| requester.user_id)
    }
}

pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        let secret = config.jwt_secret().expose_secret();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_base64_secret(secret)?,
            decoding_key: DecodingKey::from_base64_secret(secret)?,
            validation,
        })
    }

    pub fn issue(
        &self,
        user_id: Uuid,
        permissions: &[Permission],
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let claims = AccessTokenClaims {
            sub: user_id,
            exp: (Utc::now() + ttl).timestamp(),
            permissions: permissions.iter().map(ToString::to_string).collect(),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<RequestContext, AuthError> {
        let claims = decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?.claims;

        let permissions = claims
            .permissions
            .iter()
            .filter_map(|name| match Permission::from_str(name) {
                Ok(permission) => Some(permission),
                Err(_) => {
                    tracing::debug!(permission = %name, "ignoring unknown permission");
                    None
                }
            })
            .collect::<Vec<_>>();

        Ok(RequestContext::staff(claims.sub, permissions))
    }
}

fn bearer_token(value: &str) -> Result<&str, AuthError> {
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::InvalidScheme)?;
    if !scheme.eq_ignore_ascii_case("bearer") || token.trim().is_empty() {
        return Err(AuthError::InvalidScheme);
    }
    Ok(token.trim())
}

/// Resolves the `Authorization` header into a [`RequestContext`] extension.
pub async fn authenticate(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let ctx = match request.headers().get(AUTHORIZATION) {
        None => RequestContext::anonymous(),
        Some(value) => {
            let verified = value
                .to_str()
                .map_err(|_| AuthError::InvalidScheme)
                .and_then(bearer_token)
                .and_then(|token| state.jwt().verify(token));

            match verified {
                Ok(ctx) => ctx,
                Err(error) => {
                    tracing::warn!(%error, "rejected access token");
                    return ErrorResponse::new(StatusCode::UNAUTHORIZED, "invalid access token")
                        .into_response();
                }
            }
        }
    };

    request.extensions_mut().insert(ctx);
    next.run(request).await
}
