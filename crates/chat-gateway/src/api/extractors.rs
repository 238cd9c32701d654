//! Request extractors
//!
//! Bearer authentication, validated JSON bodies and offset pagination.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRef, FromRequest, FromRequestParts, Query, Request},
    http::request::Parts,
    Json,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use serde::{de::DeserializeOwned, Deserialize};
use validator::Validate;

use super::response::ApiError;
use crate::server::GatewayState;

// ============================================================================
// Authentication
// ============================================================================

/// Authenticated caller extracted from `Authorization: Bearer <jwt>`
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    GatewayState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::MissingAuth)?;

        let state = GatewayState::from_ref(state);
        let user_id = state.jwt_service().verify(bearer.token()).map_err(|e| {
            tracing::debug!(error = %e, "Invalid access token");
            ApiError::from(e)
        })?;

        Ok(AuthUser { user_id })
    }
}

// ============================================================================
// Validated JSON
// ============================================================================

/// JSON body that must pass `validator` checks
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e: JsonRejection| ApiError::InvalidBody(e.body_text()))?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// `?limit=&offset=` query parameters
///
/// Bounds are applied by the message service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pagination) = Query::<Pagination>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.body_text()))?;
        Ok(pagination)
    }
}
