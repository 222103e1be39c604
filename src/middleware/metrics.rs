/*
 * Responsibility
 * - Roll up request/error/panic counts as requests come back off the chain
 */
use std::sync::Arc;

use crate::metrics::Metrics;
use crate::web::{Handler, Middleware};

/// Count every request, every error, and every recovered panic. Sits inside
/// the error translator so it observes errors before they become responses.
pub fn metrics(m: Metrics) -> Middleware {
    Arc::new(move |next: Handler| -> Handler {
        let m = m.clone();
        Arc::new(move |ctx, req| {
            let next = next.clone();
            let m = m.clone();
            Box::pin(async move {
                let res = next(ctx, req).await;

                m.add_request();
                if let Err(err) = &res {
                    m.add_error();
                    if err.is_shutdown() {
                        m.add_panic();
                    }
                }

                res
            })
        })
    })
}
