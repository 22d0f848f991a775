// src/server/mod.rs - TCP command server lifecycle
//
// Owns the listening socket, the accept loop and the set of live
// connections. `start` binds and begins accepting; `stop` halts acceptance,
// signals every connection and the motion engine, and waits (bounded) for
// them to drain. Both are idempotent.
pub mod connection;

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::ServerConfig;
use crate::motion::MotionEngine;
use crate::router::CommandRouter;
use connection::ClientConnection;

const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        source: std::io::Error,
    },
}

pub struct CommandServer {
    config: ServerConfig,
    router: Arc<CommandRouter>,
    engine: Arc<MotionEngine>,
    running: AtomicBool,
    shutdown_tx: broadcast::Sender<()>,
    accept_task: Mutex<Option<JoinHandle<()>>>,
    connections: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
    local_addr: Mutex<Option<SocketAddr>>,
}

impl CommandServer {
    pub fn new(config: ServerConfig, router: Arc<CommandRouter>, engine: Arc<MotionEngine>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            router,
            engine,
            running: AtomicBool::new(false),
            shutdown_tx,
            accept_task: Mutex::new(None),
            connections: Arc::new(Mutex::new(HashMap::new())),
            local_addr: Mutex::new(None),
        }
    }

    /// Binds the listening port and starts accepting. A bind failure is
    /// fatal and surfaced to the caller; calling `start` on a running server
    /// is a no-op.
    pub async fn start(&self) -> Result<(), ServerError> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Ok(());
        }

        let listener = match TcpListener::bind(("0.0.0.0", self.config.port)).await {
            Ok(listener) => listener,
            Err(source) => {
                self.running.store(false, Ordering::SeqCst);
                return Err(ServerError::Bind {
                    port: self.config.port,
                    source,
                });
            }
        };

        let local_addr = listener.local_addr().ok();
        *self.local_addr.lock().unwrap() = local_addr;

        // Subscribe before spawning so a stop() issued immediately after
        // start() cannot slip past the accept loop.
        let shutdown_rx = self.shutdown_tx.subscribe();
        let handle = tokio::spawn(accept_loop(
            listener,
            self.config.loopback_only,
            self.router.clone(),
            self.connections.clone(),
            self.shutdown_tx.clone(),
            shutdown_rx,
        ));
        *self.accept_task.lock().unwrap() = Some(handle);

        if let Some(addr) = local_addr {
            tracing::info!("Server started on port {}", addr.port());
        }
        Ok(())
    }

    /// Halts acceptance, terminates connections and drains the motion
    /// engine. Safe to call repeatedly; later calls have no effect.
    pub async fn stop(&self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }

        let _ = self.shutdown_tx.send(());

        let accept_task = self.accept_task.lock().unwrap().take();
        if let Some(handle) = accept_task {
            if tokio::time::timeout(DRAIN_TIMEOUT, handle).await.is_err() {
                tracing::warn!("Timed out waiting for accept loop to stop");
            }
        }

        let handles: Vec<(u64, JoinHandle<()>)> =
            self.connections.lock().unwrap().drain().collect();
        for (id, handle) in handles {
            if tokio::time::timeout(DRAIN_TIMEOUT, handle).await.is_err() {
                tracing::warn!("Timed out waiting for connection {} to close", id);
            }
        }

        self.engine.shutdown().await;
        tracing::info!("Server stopped.");
    }

    /// Bound address, available once `start` has succeeded. Lets callers
    /// (and tests) bind port 0 and discover the assigned port.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.local_addr.lock().unwrap()
    }
}

async fn accept_loop(
    listener: TcpListener,
    loopback_only: bool,
    router: Arc<CommandRouter>,
    connections: Arc<Mutex<HashMap<u64, JoinHandle<()>>>>,
    shutdown_tx: broadcast::Sender<()>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut next_id: u64 = 1;

    loop {
        tokio::select! {
            _ = shutdown_rx.recv() => {
                tracing::debug!("Accept loop shutting down");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((socket, peer)) => {
                    if loopback_only && !peer.ip().is_loopback() {
                        tracing::warn!("Rejecting connection from non-loopback peer: {}", peer);
                        continue;
                    }
                    tracing::info!("Client connection from {}", peer);

                    let id = next_id;
                    next_id += 1;

                    let conn = ClientConnection::new(
                        socket,
                        peer,
                        router.clone(),
                        shutdown_tx.subscribe(),
                    );

                    // Insert under the lock so the connection's own removal
                    // cannot run before its handle is registered.
                    let mut conns = connections.lock().unwrap();
                    let registry = connections.clone();
                    let handle = tokio::spawn(async move {
                        conn.run().await;
                        tracing::info!("Removing connection");
                        registry.lock().unwrap().remove(&id);
                    });
                    conns.insert(id, handle);
                }
                // Accept failures are logged and acceptance continues; the
                // loop must be self-healing, not fatal.
                Err(e) => {
                    tracing::error!("Accept error: {}", e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CameraContext;
    use crate::host::SimulatedHost;

    fn test_server(port: u16) -> CommandServer {
        let host = Arc::new(SimulatedHost::new());
        let ctx = Arc::new(CameraContext::new(host));
        let engine = Arc::new(MotionEngine::new(ctx.clone(), 300.0));
        let router = Arc::new(CommandRouter::new(ctx, engine.clone()));
        let config = ServerConfig {
            port,
            loopback_only: true,
        };
        CommandServer::new(config, router, engine)
    }

    #[tokio::test]
    async fn start_and_stop_are_idempotent() {
        let server = test_server(0);
        server.start().await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        // Second start is a no-op, address unchanged.
        server.start().await.unwrap();
        assert_eq!(server.local_addr().unwrap(), addr);

        server.stop().await;
        server.stop().await;
    }

    #[tokio::test]
    async fn bind_conflict_is_surfaced() {
        let first = test_server(0);
        first.start().await.unwrap();
        let port = first.local_addr().unwrap().port();

        let second = test_server(port);
        assert!(matches!(
            second.start().await,
            Err(ServerError::Bind { .. })
        ));

        first.stop().await;
    }
}
