//! Router configuration.
//!
//! Every resource gets the same five routes under `/api/{route}`; the
//! handlers in [`crate::handlers::resource`] are instantiated once per
//! entity type.

use crate::handlers::{health_check, readiness_check, resource};
use crate::middleware::request_tracking_layer;
use crate::state::AppState;
use axum::{routing::get, Router};
use eventhub_core::{Category, Comment, Entity, Event, Participation, User};
use tower_http::trace::TraceLayer;

/// Routes for one resource type, relative to `/api`.
fn resource_routes<T: Entity>() -> Router<AppState> {
    let collection = format!("/{}", T::KIND.route());
    let member = format!("/{}/:id", T::KIND.route());

    Router::new()
        .route(
            &collection,
            get(resource::list::<T>).post(resource::create::<T>),
        )
        .route(
            &member,
            get(resource::get::<T>)
                .put(resource::update::<T>)
                .delete(resource::delete::<T>),
        )
}

/// Build the complete Axum router.
///
/// - `GET /health`, `GET /ready`
/// - `/api/categoria`, `/api/evento`, `/api/participante`, `/api/usuario`,
///   `/api/comentario`, each with list, get, create, update and delete
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(resource_routes::<Category>())
        .merge(resource_routes::<Event>())
        .merge(resource_routes::<Participation>())
        .merge(resource_routes::<User>())
        .merge(resource_routes::<Comment>());

    Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .layer(request_tracking_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
