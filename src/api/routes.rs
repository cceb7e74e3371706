use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::{api as auth_api, auth_middleware, AccountService};
use crate::middleware::request_logging;

/// Create the API router
pub fn create_router(service: AccountService) -> Router {
    // Routes that require a bearer token
    let protected_routes = Router::new()
        .route("/user", get(auth_api::get_current_user))
        .route_layer(middleware::from_fn_with_state(
            service.jwt(),
            auth_middleware,
        ))
        .with_state(service.clone());

    let public_routes = Router::new()
        .route("/", get(auth_api::root))
        .route("/newuser", post(auth_api::register))
        .route("/login", post(auth_api::login))
        .with_state(service);

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
