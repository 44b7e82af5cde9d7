//! Liveness HTTP server
//!
//! One route, `GET /`, answering with a fixed plaintext body. It exists so the
//! hosting platform has something to poll while the bot runs.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use once_cell::sync::OnceCell;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::application::errors::{BotError, ConfigError};
use crate::infrastructure::config::LivenessConfig;

/// Body returned by the liveness route
pub const LIVENESS_BODY: &str = "Bot is running!";

/// Route table for the liveness server
pub fn router() -> Router {
    Router::new().route("/", get(home))
}

async fn home() -> &'static str {
    LIVENESS_BODY
}

/// Serve the liveness routes on an already bound listener
pub async fn serve(listener: TcpListener) -> Result<(), BotError> {
    axum::serve(listener, router())
        .await
        .map_err(|e| BotError::Network(format!("Liveness server failed: {}", e)))
}

/// Liveness server bound to a single configured address
#[derive(Debug, Clone)]
pub struct LivenessServer {
    addr: SocketAddr,
}

impl LivenessServer {
    pub fn new(addr: SocketAddr) -> Self {
        Self { addr }
    }

    pub fn from_config(config: &LivenessConfig) -> Result<Self, ConfigError> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue(format!("Invalid liveness address {}:{}: {}", config.host, config.port, e)))?;
        Ok(Self::new(addr))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub async fn bind(&self) -> Result<TcpListener, BotError> {
        TcpListener::bind(self.addr)
            .await
            .map_err(|e| BotError::Network(format!("Failed to bind liveness server on {}: {}", self.addr, e)))
    }

    /// Bind and serve on a detached task. Failures are logged, never returned.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let listener = match self.bind().await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!("{}", e);
                    return;
                }
            };
            tracing::info!("Liveness server listening on {}", self.addr);

            if let Err(e) = serve(listener).await {
                tracing::error!("{}", e);
            }
        })
    }
}

/// Starts a liveness server at most once, however many times it is asked to
pub struct LivenessHandle {
    server: LivenessServer,
    task: OnceCell<JoinHandle<()>>,
}

impl LivenessHandle {
    pub fn new(server: LivenessServer) -> Self {
        Self {
            server,
            task: OnceCell::new(),
        }
    }

    /// Spawn the server unless it is already running. Returns true if this
    /// call spawned it.
    pub fn ensure_started(&self) -> bool {
        let mut spawned = false;
        self.task.get_or_init(|| {
            spawned = true;
            self.server.clone().spawn()
        });
        spawned
    }

    pub fn addr(&self) -> SocketAddr {
        self.server.addr()
    }
}

#[cfg(test)]
impl LivenessHandle {
    pub fn is_started(&self) -> bool {
        self.task.get().is_some()
    }
}
