// src/routes/app_routes.rs

use std::sync::Arc;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Extension, Router,
};
use deadpool_postgres::Pool;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    app_state::AppState,
    handlers::{auth_handlers, conversation_handlers, profile_handlers},
    middleware::{auth_middleware::auth_middleware, ws_auth_middleware::ws_auth_middleware},
    websocket::{connection_manager::ConnectionManager, handlers::websocket_handler},
};

pub fn create_router(db: Arc<Pool>) -> Router {
    let connections = ConnectionManager::new();
    let state = AppState::new(db, connections);

    Router::new()
        .route("/", get(|| async { "Echoes DM" }))
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .route(
            "/me",
            get(auth_handlers::me).route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/users/:username",
            get(profile_handlers::find_profile).route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/conversations",
            get(conversation_handlers::list_conversations)
                .post(conversation_handlers::start_conversation)
                .route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/conversations/:conversation_id/messages",
            get(conversation_handlers::get_thread)
                .post(conversation_handlers::send_message)
                .route_layer(from_fn(auth_middleware)),
        )
        .route(
            "/ws",
            get(websocket_handler).route_layer(from_fn(ws_auth_middleware)),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(Extension(state)),
        )
}
