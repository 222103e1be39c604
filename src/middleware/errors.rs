/*
 * Responsibility
 * - The sole boundary translating handler errors into HTTP responses
 * - Logs every error with the request's trace id
 * - Lets shutdown-classified errors keep flowing to the dispatcher
 */
use std::sync::Arc;

use tracing::error;

use crate::web::{Handler, Middleware, respond};

/// Translate any error coming back up the chain into exactly one response
/// body and status code. Shutdown-classified errors are logged here but
/// re-raised so the dispatcher can trigger process shutdown; the dispatcher
/// writes their masked response.
pub fn errors() -> Middleware {
    Arc::new(|next: Handler| -> Handler {
        Arc::new(move |ctx, req| {
            let next = next.clone();
            Box::pin(async move {
                match next(ctx.clone(), req).await {
                    Ok(res) => Ok(res),
                    Err(err) => {
                        error!(trace_id = %ctx.trace_id(), error = ?err, "request error");

                        if err.is_shutdown() {
                            return Err(err);
                        }

                        respond(&ctx, err.to_response(), err.status())
                    }
                }
            })
        })
    })
}
