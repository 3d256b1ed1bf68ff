use axum::{
    body::Body,
    extract::Query,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::Response,
    Extension,
};
use serde::Deserialize;
use tracing::{debug, error};

use crate::{
    app_state::AppState, middleware::auth_middleware::CurrentUser, services::auth_service,
};

/// Browsers cannot set headers on a WebSocket handshake, so the token may
/// arrive as a query parameter instead.
#[derive(Deserialize, Debug)]
pub struct WebSocketParams {
    pub token: Option<String>,
}

pub async fn ws_auth_middleware(
    Query(params): Query<WebSocketParams>,
    headers: HeaderMap,
    Extension(state): Extension<AppState>,
    mut request: Request<Body>,
    next: Next<Body>,
) -> Result<Response, StatusCode> {
    let token = if let Some(token) = params.token {
        token
    } else if let Some(auth) = headers.get("Authorization") {
        match auth.to_str() {
            Ok(auth_str) => auth_str.trim_start_matches("Bearer ").trim().to_string(),
            Err(e) => {
                error!("failed to parse Authorization header: {}", e);
                return Err(StatusCode::UNAUTHORIZED);
            }
        }
    } else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    // Socket logins are checked against the session table rather than the
    // token signature alone, so a revoked session cannot reconnect.
    match auth_service::verify_session(&state.db, &token).await {
        Ok(user_id) => {
            debug!("socket session verified for user {}", user_id);
            request.extensions_mut().insert(CurrentUser(user_id));
            Ok(next.run(request).await)
        }
        Err(e) => {
            error!("socket token verification failed: {}", e);
            Err(StatusCode::UNAUTHORIZED)
        }
    }
}
