use axum::{Extension, Json, Router, routing::get};

use holocron_core::UserId;

use crate::app::SharedStore;
use crate::app::dto::{self, UserResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::extract::{JsonBody, PathId};
use crate::app::routes::RouterExt;

pub fn router() -> Router {
    Router::new()
        .route_lenient("/user", get(list_users).post(create_user))
        .route_lenient("/users/:id", get(get_user))
        .route_lenient("/users/:id/favorites", get(get_user))
}

pub async fn list_users(Extension(store): Extension<SharedStore>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = store.list_users().await?;
    let mut items = Vec::with_capacity(users.len());
    for user in users {
        items.push(UserResponse::load(store.as_ref(), user).await?);
    }
    Ok(Json(items))
}

/// Serves both `/users/:id` and `/users/:id/favorites`; the user record
/// already embeds the favorites.
pub async fn get_user(
    Extension(store): Extension<SharedStore>,
    PathId(id): PathId<UserId>,
) -> ApiResult<Json<UserResponse>> {
    let Some(user) = store.get_user(id).await? else {
        tracing::debug!(%id, "user not found");
        return Err(ApiError::not_found("User not found"));
    };
    Ok(Json(UserResponse::load(store.as_ref(), user).await?))
}

pub async fn create_user(
    Extension(store): Extension<SharedStore>,
    JsonBody(body): JsonBody<dto::CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = store.insert_user(body.into_new_user()?).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "user created");

    // A fresh account has no favorites yet.
    Ok(Json(UserResponse::new(user, Vec::new(), Vec::new())))
}
