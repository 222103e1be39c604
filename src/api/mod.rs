/*
 * Responsibility
 * - Route table: which handler, which group, which middleware
 * - Global middleware order: logger, errors, metrics, panics (outermost
 *   first); auth middleware is per-route so it runs just before the handler
 */
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;
use tokio::sync::watch;

use crate::auth::{Auth, Role};
use crate::metrics::Metrics;
use crate::middleware::{authenticate, authorize, errors, logger, metrics, panics};
use crate::web::{App, handler};

pub mod handlers;

/// Everything the route table needs, injected by the caller.
pub struct MuxConfig {
    pub shutdown: watch::Sender<()>,
    pub auth: Arc<Auth>,
    pub metrics: Metrics,
}

/// Build the dispatcher with the global middleware applied to every route.
pub fn mux(cfg: MuxConfig) -> App {
    let mut app = App::new(
        cfg.shutdown.clone(),
        vec![
            logger(),
            errors(),
            metrics(cfg.metrics.clone()),
            panics(),
        ],
    );

    v1(&mut app, &cfg);

    app.handle(Method::GET, "", "/health/liveness", handler(handlers::liveness), &[]);
    app.handle(Method::GET, "", "/health/readiness", handler(handlers::readiness), &[]);

    let m = cfg.metrics.clone();
    app.handle(
        Method::GET,
        "",
        "/metrics",
        handler(move |ctx, _req| {
            let m = m.clone();
            async move {
                ctx.set_status(StatusCode::OK);
                Ok((StatusCode::OK, m.render()).into_response())
            }
        }),
        &[],
    );

    app
}

fn v1(app: &mut App, cfg: &MuxConfig) {
    const VER: &str = "v1";

    app.handle(Method::GET, VER, "/test", handler(handlers::test), &[]);
    app.handle(
        Method::GET,
        VER,
        "/testauth",
        handler(handlers::test),
        &[
            authenticate(cfg.auth.clone()),
            authorize(vec![Role::Admin]),
        ],
    );
}
