//! Favorite links (`/favorite/planet/:id`, `/favorite/people/:id`).
//!
//! Both kinds follow the same rules: adding validates that the target and the
//! user exist before inserting; removing deletes the first matching link and
//! answers 404 when there is none.

use axum::{Extension, Json, Router, routing::post};

use holocron_core::{FavoriteKind, PersonId, PlanetId};

use crate::app::SharedStore;
use crate::app::dto::{FavoritePersonResponse, FavoritePlanetResponse, FavoriteRequest, MessageResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::extract::{JsonBody, PathId};
use crate::app::routes::RouterExt;

pub fn router() -> Router {
    Router::new()
        .route_lenient(
            "/favorite/planet/:planet_id",
            post(add_favorite_planet).delete(delete_favorite_planet),
        )
        .route_lenient(
            "/favorite/people/:people_id",
            post(add_favorite_people).delete(delete_favorite_people),
        )
}

pub async fn add_favorite_planet(
    Extension(store): Extension<SharedStore>,
    PathId(planet_id): PathId<PlanetId>,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> ApiResult<Json<FavoritePlanetResponse>> {
    let planet = store.get_planet(planet_id).await?;
    let user = store.get_user(body.user_id).await?;
    let (Some(planet), Some(_)) = (planet, user) else {
        return Err(ApiError::not_found("Planet or User not found"));
    };

    let link = store.insert_favorite_planet(body.user_id, planet_id).await?;
    tracing::info!(favorite_id = %link.id, user_id = %link.user_id, %planet_id, "favorite planet added");
    Ok(Json(FavoritePlanetResponse::new(link, planet)))
}

pub async fn add_favorite_people(
    Extension(store): Extension<SharedStore>,
    PathId(people_id): PathId<PersonId>,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> ApiResult<Json<FavoritePersonResponse>> {
    let person = store.get_person(people_id).await?;
    let user = store.get_user(body.user_id).await?;
    let (Some(person), Some(_)) = (person, user) else {
        return Err(ApiError::not_found("People or User not found"));
    };

    let link = store.insert_favorite_person(body.user_id, people_id).await?;
    tracing::info!(favorite_id = %link.id, user_id = %link.user_id, %people_id, "favorite people added");
    Ok(Json(FavoritePersonResponse::new(link, person)))
}

pub async fn delete_favorite_planet(
    Extension(store): Extension<SharedStore>,
    PathId(planet_id): PathId<PlanetId>,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let kind = FavoriteKind::Planet;
    let Some(link) = store.find_favorite_planet(planet_id, body.user_id).await? else {
        return Err(favorite_not_found(kind));
    };

    store.delete_favorite(kind, link.id).await?;
    tracing::info!(%kind, favorite_id = %link.id, user_id = %body.user_id, %planet_id, "favorite removed");
    Ok(Json(MessageResponse {
        msg: format!("Planet {planet_id} removed from favorites"),
    }))
}

pub async fn delete_favorite_people(
    Extension(store): Extension<SharedStore>,
    PathId(people_id): PathId<PersonId>,
    JsonBody(body): JsonBody<FavoriteRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let kind = FavoriteKind::People;
    let Some(link) = store.find_favorite_person(people_id, body.user_id).await? else {
        return Err(favorite_not_found(kind));
    };

    store.delete_favorite(kind, link.id).await?;
    tracing::info!(%kind, favorite_id = %link.id, user_id = %body.user_id, %people_id, "favorite removed");
    Ok(Json(MessageResponse {
        msg: format!("People {people_id} removed from favorites"),
    }))
}

fn favorite_not_found(kind: FavoriteKind) -> ApiError {
    tracing::debug!(%kind, "favorite link not found");
    ApiError::not_found(format!("Favorite {kind} not found"))
}
