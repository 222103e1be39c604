/*
 * Responsibility
 * - Health probes (liveness/readiness)
 * - Dev test handler used by the protected/unprotected test routes
 */
use std::sync::Arc;

use axum::body::Body;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::Response;
use serde::Serialize;

use crate::error::AppError;
use crate::web::{Context, respond};

#[derive(Serialize)]
struct Status {
    status: &'static str,
}

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
}

pub async fn test(ctx: Arc<Context>, _req: Request<Body>) -> Result<Response, AppError> {
    respond(&ctx, Status { status: "ok" }, StatusCode::OK)
}

pub async fn readiness(ctx: Arc<Context>, _req: Request<Body>) -> Result<Response, AppError> {
    respond(&ctx, Status { status: "ok" }, StatusCode::OK)
}

pub async fn liveness(ctx: Arc<Context>, _req: Request<Body>) -> Result<Response, AppError> {
    let body = Liveness {
        status: "up",
        host: std::env::var("HOSTNAME").ok(),
    };
    respond(&ctx, body, StatusCode::OK)
}
