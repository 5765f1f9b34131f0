//! Acting-identity extractor.
//!
//! Authentication lives in an upstream identity service; by the time a
//! request reaches this core it carries the resolved actor in headers.
//! The extractor turns `X-Actor-Id` and `X-Actor-Role` into an explicit
//! [`Actor`] value passed to every command, so no handler reads a hidden
//! request-scoped global.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use std::str::FromStr;
use uuid::Uuid;

use domain::models::{Actor, ActorRole};

use crate::error::ApiError;

/// Header carrying the resolved actor's id.
pub const ACTOR_ID_HEADER: &str = "X-Actor-Id";

/// Header carrying the resolved actor's role tag.
pub const ACTOR_ROLE_HEADER: &str = "X-Actor-Role";

/// The resolved actor for the current request.
#[derive(Debug, Clone, Copy)]
pub struct ActorIdentity(pub Actor);

#[async_trait]
impl<S> FromRequestParts<S> for ActorIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(ACTOR_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing X-Actor-Id header".to_string()))?;

        let id = Uuid::parse_str(id)
            .map_err(|_| ApiError::Unauthorized("Invalid X-Actor-Id header".to_string()))?;

        let role = parts
            .headers
            .get(ACTOR_ROLE_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing X-Actor-Role header".to_string()))?;

        let role = ActorRole::from_str(role)
            .map_err(|_| ApiError::Unauthorized("Unknown X-Actor-Role value".to_string()))?;

        Ok(ActorIdentity(Actor::new(id, role)))
    }
}
