pub mod error;
mod graphql;
mod health;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{AppState, auth::authenticate};

pub fn router(state: AppState) -> Router {
    let graphql = if state.config().graphiql_enabled {
        get(graphql::graphiql).post(graphql::graphql_handler)
    } else {
        axum::routing::post(graphql::graphql_handler)
    };

    let api = Router::new()
        .route("/graphql", graphql)
        .layer(from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .route("/health", get(health::health))
        .merge(api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
