//! Extractors that turn axum's plain-text rejections into [`ApiError`]s.

use axum::async_trait;
use axum::extract::{FromRequest, FromRequestParts, Json, Path, Request};
use axum::http::request::Parts;
use core::str::FromStr;
use serde::de::DeserializeOwned;

use holocron_core::DomainError;

use crate::app::errors::ApiError;

/// JSON request body. Missing fields, wrong types and a missing
/// `Content-Type` all become 400s.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

/// Raw path parameters; a segment that does not deserialize becomes a 400.
#[derive(Debug)]
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::bad_request(rejection.body_text())),
        }
    }
}

/// A single path id parsed with the id type's own `FromStr`, so a non-numeric
/// segment surfaces as [`DomainError::InvalidId`].
#[derive(Debug)]
pub struct PathId<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for PathId<T>
where
    T: FromStr<Err = DomainError> + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ApiPath(raw) = ApiPath::<String>::from_request_parts(parts, state).await?;
        let id = raw.parse::<T>()?;
        Ok(Self(id))
    }
}
