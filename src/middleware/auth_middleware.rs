use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;
use uuid::Uuid;

use crate::services::jwt_service::validate_token;

/// The authenticated caller, inserted into request extensions by the auth
/// middlewares and consumed by handlers.
#[derive(Debug, Clone, Copy)]
pub struct CurrentUser(pub Uuid);

pub async fn auth_middleware(mut req: Request<Body>, next: Next<Body>) -> Result<Response, StatusCode> {
    // Extract the token from the request's Authorization header
    if let Some(auth_header) = req.headers().get("Authorization") {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                let token = token.trim();

                if let Some(user_id) = validate_token(token) {
                    debug!("valid JWT token for user {}", user_id);
                    req.extensions_mut().insert(CurrentUser(user_id));
                    return Ok(next.run(req).await);
                }

                debug!("rejected invalid or expired JWT token");
                return Err(StatusCode::UNAUTHORIZED);
            }
        }
    }

    Err(StatusCode::UNAUTHORIZED)
}
