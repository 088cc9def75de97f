//! Relay server: binds the listener and serves the router until shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::relay::Relay;

/// A bound relay server, ready to run
pub struct RelayServer {
    listener: TcpListener,
    config: RelayConfig,
    state: Arc<AppState>,
}

impl RelayServer {
    /// Bind the configured address
    pub async fn bind(config: RelayConfig) -> RelayResult<Self> {
        let listener = TcpListener::bind(config.bind).await?;
        Ok(Self {
            listener,
            config,
            state: Arc::new(AppState::new(Arc::new(Relay::new()))),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle to the relay, for inspecting the connection set
    pub fn relay(&self) -> Arc<Relay> {
        Arc::clone(&self.state.relay)
    }

    /// Serve until `shutdown` resolves
    pub async fn run_until<F>(self, shutdown: F) -> RelayResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let RelayServer {
            listener,
            config,
            state,
        } = self;
        let app = create_router(state, &config.cors);

        if let Ok(addr) = listener.local_addr() {
            info!(%addr, "relay listening");
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("relay stopped");
        Ok(())
    }

    /// Serve until Ctrl+C / SIGTERM
    pub async fn run_until_ctrl_c(self) -> RelayResult<()> {
        let stop = Arc::new(Notify::new());
        let signal = Arc::clone(&stop);
        if let Err(err) = ctrlc::set_handler(move || signal.notify_one()) {
            warn!(error = %err, "failed to install ctrl-c handler");
        }

        self.run_until(async move {
            stop.notified().await;
            info!("shutdown requested");
        })
        .await
    }
}
