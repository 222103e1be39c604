/*
 * Responsibility
 * - The one place a handler turns data into an HTTP response
 * - Records the status code on the request context as it does so
 */
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;
use crate::web::Context;

/// Serialize `data` as the JSON response body with `status`, recording the
/// status on the context for the logging middleware. A 204 sends no body.
pub fn respond<T: Serialize>(
    ctx: &Context,
    data: T,
    status: StatusCode,
) -> Result<Response, AppError> {
    ctx.set_status(status);

    if status == StatusCode::NO_CONTENT {
        return Ok(status.into_response());
    }

    Ok((status, Json(data)).into_response())
}
