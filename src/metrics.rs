/*
 * Responsibility
 * - Process-wide request/error/panic counters on a prometheus registry
 * - Constructed once at startup and injected into consumers; no globals
 */
use std::sync::Arc;

use prometheus::{Encoder, IntCounter, Registry, TextEncoder};
use tracing::error;

#[derive(Clone)]
pub struct Metrics {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Registry,
    requests: IntCounter,
    errors: IntCounter,
    panics: IntCounter,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("requests", &self.inner.requests.get())
            .field("errors", &self.inner.errors.get())
            .field("panics", &self.inner.panics.get())
            .finish()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests = IntCounter::new("warden_requests_total", "Total requests handled")
            .expect("metric can be created");
        let errors = IntCounter::new("warden_errors_total", "Total requests that ended in error")
            .expect("metric can be created");
        let panics = IntCounter::new("warden_panics_total", "Total panics recovered")
            .expect("metric can be created");

        for metric in [&requests, &errors, &panics] {
            registry
                .register(Box::new(metric.clone()))
                .expect("metric can be registered");
        }

        Self {
            inner: Arc::new(Inner {
                registry,
                requests,
                errors,
                panics,
            }),
        }
    }

    pub fn add_request(&self) {
        self.inner.requests.inc();
    }

    pub fn add_error(&self) {
        self.inner.errors.inc();
    }

    pub fn add_panic(&self) {
        self.inner.panics.inc();
    }

    pub fn requests(&self) -> u64 {
        self.inner.requests.get()
    }

    pub fn errors(&self) -> u64 {
        self.inner.errors.get()
    }

    pub fn panics(&self) -> u64 {
        self.inner.panics.get()
    }

    /// Render the registry in the prometheus text exposition format.
    pub fn render(&self) -> String {
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(err) = encoder.encode(&self.inner.registry.gather(), &mut buf) {
            error!(error = ?err, "encoding metrics");
            return String::new();
        }
        String::from_utf8(buf).unwrap_or_default()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
