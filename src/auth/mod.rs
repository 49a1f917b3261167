use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::{
    error::{AppError, AppResult},
    AppState,
};

pub const API_KEY_HEADER: &str = "x-api-key";

/// Rejects any request whose `X-API-Key` header does not match the
/// configured key. Applied as a layer over every route.
pub async fn require_api_key(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> AppResult<Response> {
    check_api_key(request.headers(), &state.api_key)?;
    Ok(next.run(request).await)
}

fn check_api_key(headers: &HeaderMap, expected: &str) -> AppResult<()> {
    let Some(value) = headers.get(API_KEY_HEADER) else {
        warn!("Missing X-API-Key header");
        return Err(AppError::Unauthorized("Not authenticated".to_string()));
    };

    match value.to_str() {
        Ok(key) if key == expected => Ok(()),
        _ => {
            warn!("Invalid API key provided");
            Err(AppError::Unauthorized("Invalid API Key".to_string()))
        }
    }
}
