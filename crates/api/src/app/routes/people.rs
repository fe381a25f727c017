use axum::{Extension, Json, Router, routing::get};

use holocron_core::PersonId;
use holocron_infra::StoreError;

use crate::app::SharedStore;
use crate::app::dto::{self, PersonResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::extract::{JsonBody, PathId};
use crate::app::routes::RouterExt;

const NOT_FOUND: &str = "People not found";

pub fn router() -> Router {
    Router::new()
        .route_lenient("/people", get(list_people).post(create_person))
        .route_lenient("/people/:id", get(get_person).delete(delete_person))
}

pub async fn list_people(Extension(store): Extension<SharedStore>) -> ApiResult<Json<Vec<PersonResponse>>> {
    let people = store.list_people().await?;
    Ok(Json(people.into_iter().map(Into::into).collect()))
}

pub async fn get_person(
    Extension(store): Extension<SharedStore>,
    PathId(id): PathId<PersonId>,
) -> ApiResult<Json<PersonResponse>> {
    match store.get_person(id).await? {
        Some(person) => Ok(Json(person.into())),
        None => {
            tracing::debug!(people_id = %id, "person not found");
            Err(ApiError::not_found(NOT_FOUND))
        }
    }
}

pub async fn create_person(
    Extension(store): Extension<SharedStore>,
    JsonBody(body): JsonBody<dto::CreatePersonRequest>,
) -> ApiResult<Json<PersonResponse>> {
    let person = store.insert_person(body.into_new_person()?).await?;
    tracing::info!(people_id = %person.id, name = %person.name, "person created");
    Ok(Json(person.into()))
}

pub async fn delete_person(
    Extension(store): Extension<SharedStore>,
    PathId(id): PathId<PersonId>,
) -> ApiResult<Json<PersonResponse>> {
    match store.delete_person(id).await {
        Ok(person) => {
            tracing::info!(people_id = %id, "person deleted");
            Ok(Json(person.into()))
        }
        Err(StoreError::NotFound) => {
            tracing::debug!(people_id = %id, "person not found for delete");
            Err(ApiError::not_found(NOT_FOUND))
        }
        Err(e) => Err(e.into()),
    }
}
