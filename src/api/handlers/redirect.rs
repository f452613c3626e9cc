//! Handlers for short-link redirects.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};

use crate::domain::{ClientMetadata, Resolution};
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its destination URL.
///
/// # Endpoint
///
/// `GET /r/{code}`
///
/// # Request Flow
///
/// 1. Extract client metadata (user agent, referer, client IP headers)
/// 2. Answer statically configured codes with `308 Permanent Redirect`
/// 3. Forward the lookup to the backend with client metadata attached
/// 4. Return `302 Found` to the `Location` the backend provided
///
/// The backend's own redirect is never followed; query parameters already
/// encoded in its `Location` reach the client unchanged.
///
/// # Errors
///
/// - 400 Bad Request if the code is empty
/// - 404 Not Found if the backend does not know the code
/// - Backend 4xx/5xx status (or 500) for any other backend reply
/// - 500 Internal Server Error if the backend is unreachable
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let client = ClientMetadata::from_headers(&headers);

    let response = match state.redirect_service.resolve(&code, &client).await? {
        // axum's Redirect has no 302 constructor.
        Resolution::Found(location) => {
            (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
        }
        Resolution::Permanent(location) => Redirect::permanent(&location).into_response(),
    };

    Ok(response)
}

/// Rejects redirect requests that carry no code.
///
/// # Endpoint
///
/// `GET /r`
pub async fn missing_code_handler() -> AppError {
    AppError::bad_request("Code parameter is required")
}
