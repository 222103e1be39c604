/*
 * Responsibility
 * - Cross-cutting middleware values for the chain composer
 * - Global set: logger, errors, metrics, panics; per-route: authenticate,
 *   authorize
 */
pub mod auth;
pub mod errors;
pub mod logger;
pub mod metrics;
pub mod panics;

pub use auth::{authenticate, authorize};
pub use errors::errors;
pub use logger::logger;
pub use metrics::metrics;
pub use panics::panics;
