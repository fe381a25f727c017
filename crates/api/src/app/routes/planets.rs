use axum::{Extension, Json, Router, routing::get};

use holocron_core::PlanetId;
use holocron_infra::StoreError;

use crate::app::SharedStore;
use crate::app::dto::{self, PlanetResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::extract::{JsonBody, PathId};
use crate::app::routes::RouterExt;

const NOT_FOUND: &str = "Planet not found";

pub fn router() -> Router {
    Router::new()
        .route_lenient("/planets", get(list_planets).post(create_planet))
        .route_lenient("/planets/:id", get(get_planet).delete(delete_planet))
}

pub async fn list_planets(Extension(store): Extension<SharedStore>) -> ApiResult<Json<Vec<PlanetResponse>>> {
    let planets = store.list_planets().await?;
    Ok(Json(planets.into_iter().map(Into::into).collect()))
}

pub async fn get_planet(
    Extension(store): Extension<SharedStore>,
    PathId(id): PathId<PlanetId>,
) -> ApiResult<Json<PlanetResponse>> {
    match store.get_planet(id).await? {
        Some(planet) => Ok(Json(planet.into())),
        None => {
            tracing::debug!(planet_id = %id, "planet not found");
            Err(ApiError::not_found(NOT_FOUND))
        }
    }
}

pub async fn create_planet(
    Extension(store): Extension<SharedStore>,
    JsonBody(body): JsonBody<dto::CreatePlanetRequest>,
) -> ApiResult<Json<PlanetResponse>> {
    let planet = store.insert_planet(body.into_new_planet()?).await?;
    tracing::info!(planet_id = %planet.id, name = %planet.name, "planet created");
    Ok(Json(planet.into()))
}

pub async fn delete_planet(
    Extension(store): Extension<SharedStore>,
    PathId(id): PathId<PlanetId>,
) -> ApiResult<Json<PlanetResponse>> {
    match store.delete_planet(id).await {
        Ok(planet) => {
            tracing::info!(planet_id = %id, "planet deleted");
            Ok(Json(planet.into()))
        }
        Err(StoreError::NotFound) => {
            tracing::debug!(planet_id = %id, "planet not found for delete");
            Err(ApiError::not_found(NOT_FOUND))
        }
        Err(e) => Err(e.into()),
    }
}
