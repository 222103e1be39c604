//! # warden
//!
//! HTTP service core: a composable middleware chain over axum with a
//! signed-token identity system.
//!
//! Every route runs through the same pipeline — global middleware outermost
//! (logging, error translation, metrics, panic containment), route middleware
//! innermost (authentication, authorization), business handler at the core.
//! Errors are ordinary return values classified by [`error::AppError`];
//! shutdown-classified errors additionally trigger process-wide graceful
//! shutdown through the dispatcher's channel.
//!
//! Identity is a signed EdDSA token whose header names the key (`kid`) held
//! by [`keystore::KeyStore`]; [`auth::Auth`] issues and validates tokens and
//! [`auth::Claims::authorized`] makes every role-membership decision.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod keystore;
pub mod metrics;
pub mod middleware;
pub mod web;
