/*
 * Responsibility
 * - Contain panics from route middleware and handlers
 * - Convert an unwind into a shutdown-classified error so the error and
 *   dispatcher layers behave the same whether a handler erred or panicked
 */
use std::sync::Arc;

use crate::error::AppError;
use crate::web::{Handler, Middleware};

/// Run the rest of the chain on its own task so a panic unwinds that task
/// instead of the connection. The panic payload becomes the message of a
/// shutdown-classified error.
pub fn panics() -> Middleware {
    Arc::new(|next: Handler| -> Handler {
        Arc::new(move |ctx, req| {
            let next = next.clone();
            Box::pin(async move {
                match tokio::spawn(next(ctx, req)).await {
                    Ok(res) => res,
                    Err(join_err) => match join_err.try_into_panic() {
                        Ok(payload) => {
                            let msg = payload
                                .downcast_ref::<&str>()
                                .map(|s| s.to_string())
                                .or_else(|| payload.downcast_ref::<String>().cloned())
                                .unwrap_or_else(|| "non-string panic payload".to_string());
                            Err(AppError::shutdown(format!("PANIC [{msg}]")))
                        }
                        Err(_) => Err(AppError::shutdown("handler task cancelled")),
                    },
                }
            })
        })
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::extract::Request;
    use axum::http::StatusCode;

    use super::*;
    use crate::web::{Context, handler, respond, wrap_middleware};

    #[tokio::test]
    async fn panic_becomes_a_shutdown_error() {
        let chain = wrap_middleware(
            handler(|_ctx, _req| async { panic!("boom: {}", 42) }),
            &[panics()],
        );

        let err = chain(
            Arc::new(Context::new()),
            Request::builder().body(Body::empty()).unwrap(),
        )
        .await
        .unwrap_err();

        assert!(err.is_shutdown());
        assert!(err.to_string().contains("boom: 42"));
    }

    #[tokio::test]
    async fn non_panicking_handler_passes_through() {
        let chain = wrap_middleware(
            handler(|ctx, _req| async move {
                respond(&ctx, serde_json::json!({"status": "ok"}), StatusCode::OK)
            }),
            &[panics()],
        );

        let res = chain(
            Arc::new(Context::new()),
            Request::builder().body(Body::empty()).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
    }
}
