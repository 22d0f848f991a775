// src/server/connection.rs - One accepted client socket
//
// Drives the read → parse → route → write loop. One receive is one command;
// the next read is only issued after the reply has been written, so commands
// on a single connection never overlap.
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::broadcast;

use crate::router::CommandRouter;

const RECV_BUFFER_SIZE: usize = 1024;

pub struct ClientConnection {
    socket: TcpStream,
    peer: SocketAddr,
    router: Arc<CommandRouter>,
    shutdown_rx: broadcast::Receiver<()>,
}

impl ClientConnection {
    pub fn new(
        socket: TcpStream,
        peer: SocketAddr,
        router: Arc<CommandRouter>,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            socket,
            peer,
            router,
            shutdown_rx,
        }
    }

    /// Runs the connection until end-of-stream, I/O error or shutdown.
    /// The socket closes when the connection is dropped on return.
    pub async fn run(mut self) {
        tracing::debug!("Starting connection for client: {}", self.peer);

        let mut buffer = [0u8; RECV_BUFFER_SIZE];
        loop {
            tokio::select! {
                _ = self.shutdown_rx.recv() => {
                    tracing::debug!("Connection to {} closing for shutdown", self.peer);
                    break;
                }
                read = self.socket.read(&mut buffer) => match read {
                    Ok(0) => {
                        tracing::info!("Client disconnected.");
                        break;
                    }
                    Ok(n) => {
                        let message = String::from_utf8_lossy(&buffer[..n]);
                        let message = message.trim();
                        tracing::debug!("Received data: {}", message);

                        let mut reply = self.router.process_message(message);
                        reply.push('\n');
                        if let Err(e) = self.socket.write_all(reply.as_bytes()).await {
                            tracing::error!("Error writing to socket: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::error!("Error reading data: {}", e);
                        break;
                    }
                }
            }
        }
    }
}
