/*
 * Responsibility
 * - Request start/completion lines keyed by trace id
 */
use std::sync::Arc;

use tracing::info;

use crate::web::{Handler, Middleware};

/// Log the start and completion of every request. Runs outermost so the
/// completion line sees the status recorded by whichever layer responded.
pub fn logger() -> Middleware {
    Arc::new(|next: Handler| -> Handler {
        Arc::new(move |ctx, req| {
            let next = next.clone();
            Box::pin(async move {
                let method = req.method().clone();
                let path = req.uri().path().to_string();

                info!(
                    trace_id = %ctx.trace_id(),
                    %method,
                    %path,
                    "request started"
                );

                let res = next(ctx.clone(), req).await;

                info!(
                    trace_id = %ctx.trace_id(),
                    %method,
                    %path,
                    status = ctx.status().map(|s| s.as_u16()),
                    elapsed = ?ctx.started_at().elapsed(),
                    "request completed"
                );

                res
            })
        })
    })
}
