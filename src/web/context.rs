/*
 * Responsibility
 * - Per-request value carrier threaded through the middleware chain
 * - One dedicated field per concern: trace id, start time, status, claims
 */
use std::sync::OnceLock;
use std::time::Instant;

use axum::http::StatusCode;
use uuid::Uuid;

use crate::auth::Claims;

/// Request-scoped values. Created by the dispatcher when handling begins,
/// dropped when the response is written. Never shared across requests.
///
/// Status and claims are write-once slots: the response writer records the
/// status, the authenticate middleware records the claims, and later writes
/// are ignored.
#[derive(Debug)]
pub struct Context {
    trace_id: Uuid,
    started_at: Instant,
    status: OnceLock<StatusCode>,
    claims: OnceLock<Claims>,
}

impl Context {
    pub fn new() -> Self {
        Self {
            trace_id: Uuid::new_v4(),
            started_at: Instant::now(),
            status: OnceLock::new(),
            claims: OnceLock::new(),
        }
    }

    pub fn trace_id(&self) -> Uuid {
        self.trace_id
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    /// Record the response status. Returns false when a status was already
    /// recorded, in which case the original value stands.
    pub fn set_status(&self, status: StatusCode) -> bool {
        self.status.set(status).is_ok()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status.get().copied()
    }

    /// Attach validated claims for downstream middleware and handlers.
    pub fn set_claims(&self, claims: Claims) -> bool {
        self.claims.set(claims).is_ok()
    }

    pub fn claims(&self) -> Option<&Claims> {
        self.claims.get()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
