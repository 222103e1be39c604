/*
 * Responsibility
 * - Handler / Middleware value types and the one composition routine
 * - App dispatcher: route registration, fresh per-request Context, and the
 *   fail-fast shutdown signal on fatal errors
 */
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::Request;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodFilter, on};
use tokio::sync::watch;
use tracing::error;

use crate::error::AppError;

pub mod context;
pub mod request;
pub mod response;

pub use context::Context;
pub use request::{Validate, decode};
pub use response::respond;

/// Type-erased future every handler returns.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Response, AppError>> + Send>>;

/// A route handler: the request plus its context in, a response or an error
/// out. Errors flow back up the middleware chain; nothing here writes error
/// bodies directly.
pub type Handler = Arc<dyn Fn(Arc<Context>, Request<Body>) -> HandlerFuture + Send + Sync>;

/// A middleware is a function from a handler to a handler. An ordered list of
/// these defines execution order; see [`wrap_middleware`].
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Box an async function into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
    F: Fn(Arc<Context>, Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, AppError>> + Send + 'static,
{
    Arc::new(move |ctx, req| Box::pin(f(ctx, req)))
}

/// Wrap `handler` in `mids` so that the first element of `mids` ends up
/// outermost: it runs first on the way in and last on the way out.
pub fn wrap_middleware(handler: Handler, mids: &[Middleware]) -> Handler {
    let mut handler = handler;
    for mid in mids.iter().rev() {
        handler = mid(handler);
    }
    handler
}

/// Request dispatcher. Owns the route table, the global middleware applied
/// outermost on every route, and the shutdown side of the fail-fast channel.
pub struct App {
    router: axum::Router,
    shutdown: watch::Sender<()>,
    mids: Vec<Middleware>,
}

impl App {
    pub fn new(shutdown: watch::Sender<()>, mids: Vec<Middleware>) -> Self {
        Self {
            router: axum::Router::new(),
            shutdown,
            mids,
        }
    }

    /// Ask the process to shut down gracefully. Called when a request ends in
    /// a shutdown-classified error; such errors are symptoms the process
    /// cannot safely continue past.
    pub fn signal_shutdown(&self) {
        if self.shutdown.send(()).is_err() {
            error!("shutdown channel closed; no listener for shutdown signal");
        }
    }

    /// Register `handler` for `method` on `/{group}{path}` (or `path` when
    /// the group is empty). Route middleware wraps the handler first, global
    /// middleware wraps the result, so globals always run outermost.
    pub fn handle(
        &mut self,
        method: Method,
        group: &str,
        path: &str,
        handler: Handler,
        mids: &[Middleware],
    ) {
        let full_path = if group.is_empty() {
            path.to_string()
        } else {
            format!("/{group}{path}")
        };

        let handler = wrap_middleware(handler, mids);
        let handler = wrap_middleware(handler, &self.mids);

        let shutdown = self.shutdown.clone();
        let service = move |req: Request<Body>| {
            let handler = handler.clone();
            let shutdown = shutdown.clone();
            async move {
                let ctx = Arc::new(Context::new());
                match handler(ctx.clone(), req).await {
                    Ok(res) => res,
                    // Only shutdown-classified errors make it past the error
                    // middleware. Signal the process and still give this
                    // request its masked response.
                    Err(err) => {
                        if shutdown.send(()).is_err() {
                            error!(
                                trace_id = %ctx.trace_id(),
                                "shutdown channel closed; no listener for shutdown signal"
                            );
                        }
                        let status = err.status();
                        ctx.set_status(status);
                        (status, Json(err.to_response())).into_response()
                    }
                }
            }
        };

        let filter = MethodFilter::try_from(method.clone())
            .unwrap_or_else(|_| panic!("registering route: unsupported method {method}"));

        let router = std::mem::take(&mut self.router);
        self.router = router.route(&full_path, on(filter, service));
    }

    pub fn into_router(self) -> axum::Router {
        self.router
    }
}
