//! HTTP API application wiring (Axum router + store handle).
//!
//! - `routes/`: HTTP routes + handlers (one file per resource family)
//! - `dto.rs`: request bodies and transfer records
//! - `errors.rs`: consistent error responses
//! - `extract.rs`: extractors that reject with JSON errors

use std::sync::Arc;

use axum::{Extension, Router, routing::get};

use holocron_infra::Store;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extract;
pub mod routes;

/// Store handle shared by every handler.
pub type SharedStore = Arc<dyn Store>;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(store: SharedStore) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .fallback(routes::system::not_found)
        .layer(Extension(store))
        .layer(axum::middleware::from_fn(middleware::request_log))
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Method, Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use holocron_core::{NewPerson, NewUser};
    use holocron_infra::InMemoryStore;

    use super::*;

    async fn call(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    /// Store holding users 1..=3 and people 1..=5.
    async fn seeded() -> SharedStore {
        let store = InMemoryStore::new();
        for name in ["luke", "leia", "han"] {
            store
                .insert_user(NewUser::new(name, format!("{name}@rebellion.org"), "secret").unwrap())
                .await
                .unwrap();
        }
        for name in ["R2-D2", "C-3PO", "Lando", "Yoda", "Boba Fett"] {
            store
                .insert_person(NewPerson {
                    name: name.to_string(),
                    birth_year: 33,
                    height: 96,
                    mass: 32,
                    hair_color: "n/a".to_string(),
                    gender: "n/a".to_string(),
                })
                .await
                .unwrap();
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn add_favorite_people_embeds_person() {
        let app = build_app(seeded().await);
        let (status, body) = call(app, Method::POST, "/favorite/people/5", Some(json!({"user_id": 3}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], 1);
        assert_eq!(body["user_id"], 3);
        assert_eq!(body["people_id"], 5);
        assert_eq!(body["people"]["name"], "Boba Fett");
    }

    #[tokio::test]
    async fn delete_favorite_people_without_link_is_404() {
        let app = build_app(seeded().await);
        let (status, body) = call(app, Method::DELETE, "/favorite/people/5", Some(json!({"user_id": 3}))).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": true, "message": "Favorite people not found"}));
    }

    #[tokio::test]
    async fn delete_favorite_people_removes_existing_link() {
        let store = seeded().await;
        let (status, _) = call(
            build_app(store.clone()),
            Method::POST,
            "/favorite/people/2",
            Some(json!({"user_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(
            build_app(store.clone()),
            Method::DELETE,
            "/favorite/people/2",
            Some(json!({"user_id": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"msg": "People 2 removed from favorites"}));

        assert!(store.favorite_people_of(holocron_core::UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn body_without_content_type_is_400() {
        let app = build_app(seeded().await);
        let req = Request::builder()
            .method(Method::POST)
            .uri("/favorite/people/1")
            .body(Body::from(r#"{"user_id": 1}"#))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
