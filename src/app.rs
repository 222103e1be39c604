/*
 * Responsibility
 * - Config load -> key material -> Auth -> route table -> axum::serve
 * - Graceful shutdown: OS signals and the dispatcher's fail-fast signal feed
 *   one channel; in-flight requests drain up to the configured grace period
 */
use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::api::{self, MuxConfig};
use crate::auth::Auth;
use crate::config::Config;
use crate::keystore::KeyStore;
use crate::metrics::Metrics;

pub async fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    info!(
        addr = %config.addr,
        keys_dir = %config.keys_dir.display(),
        active_kid = %config.active_kid,
        "starting service"
    );

    let keystore =
        Arc::new(KeyStore::from_dir(&config.keys_dir).context("reading signing keys")?);
    let auth = Arc::new(Auth::new(&config.active_kid, keystore).context("constructing auth")?);
    let metrics = Metrics::new();

    let (shutdown_tx, mut shutdown_rx) = watch::channel(());
    spawn_signal_listener(shutdown_tx.clone());

    let app = api::mux(MuxConfig {
        shutdown: shutdown_tx,
        auth,
        metrics,
    });

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .context("binding listener")?;
    info!(addr = %config.addr, "listening");

    let mut drain_rx = shutdown_rx.clone();
    let serve = axum::serve(listener, app.into_router()).with_graceful_shutdown(async move {
        drain_rx.changed().await.ok();
    });
    let mut server = tokio::spawn(serve.into_future());

    tokio::select! {
        res = &mut server => {
            res.context("server task")?.context("serving")?;
            return Ok(());
        }
        _ = shutdown_rx.changed() => {}
    }

    info!(grace = ?config.shutdown_grace, "shutdown signal received; draining in-flight requests");
    match tokio::time::timeout(config.shutdown_grace, &mut server).await {
        Ok(res) => res.context("server task")?.context("serving")?,
        Err(_) => {
            warn!("grace period expired; aborting in-flight requests");
            server.abort();
        }
    }

    info!("shutdown complete");
    Ok(())
}

/// Forward SIGINT/SIGTERM onto the shutdown channel so OS signals and
/// dispatcher-triggered shutdown take the same path.
fn spawn_signal_listener(shutdown: watch::Sender<()>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{SignalKind, signal};
            let mut term = match signal(SignalKind::terminate()) {
                Ok(term) => term,
                Err(err) => {
                    error!(error = ?err, "installing SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = term.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await.ok();
        }

        let _ = shutdown.send(());
    });
}
