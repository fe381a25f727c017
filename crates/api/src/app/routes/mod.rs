use axum::Router;
use axum::routing::MethodRouter;

pub mod favorites;
pub mod people;
pub mod planets;
pub mod system;
pub mod users;

/// Router for every resource endpoint.
pub fn router() -> Router {
    Router::new()
        .merge(users::router())
        .merge(people::router())
        .merge(planets::router())
        .merge(favorites::router())
}

/// Registers a route with and without a trailing slash.
pub(crate) trait RouterExt {
    fn route_lenient(self, path: &str, method_router: MethodRouter) -> Self;
}

impl RouterExt for Router {
    fn route_lenient(self, path: &str, method_router: MethodRouter) -> Self {
        self.route(path, method_router.clone())
            .route(&format!("{path}/"), method_router)
    }
}
