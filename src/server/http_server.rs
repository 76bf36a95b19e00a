//! HTTP server implementation.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{debug, error, info, warn};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;

use crate::server::config::ServerConfig;
use crate::server::connection::{drain_request, handle_connection, write_response};
use crate::server::error::Error;
use crate::server::files::FileResponder;
use crate::server::response::HttpResponse;
use crate::server::stats::ServerStats;

/// Asks a running [`HttpServer`] to stop accepting and shut down.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: mpsc::Sender<()>,
}

impl ShutdownHandle {
    /// Request shutdown. Does nothing if the server has already stopped.
    pub async fn shutdown(&self) {
        let _ = self.tx.send(()).await;
    }
}

/// A static file server bound to a listening socket.
pub struct HttpServer {
    /// The server configuration.
    config: Arc<ServerConfig>,
    listener: TcpListener,
    files: Arc<FileResponder>,
    stats: Arc<ServerStats>,
    shutdown_tx: mpsc::Sender<()>,
    shutdown_rx: mpsc::Receiver<()>,
}

impl HttpServer {
    /// Validate the configuration and bind the listening socket.
    ///
    /// Failing to bind is fatal and reported as [`Error::SocketSetup`].
    pub async fn bind(config: ServerConfig) -> Result<Self, Error> {
        config.validate()?;

        let listener = TcpListener::bind(config.addr)
            .await
            .map_err(Error::SocketSetup)?;
        let addr = listener.local_addr().map_err(Error::SocketSetup)?;
        info!(
            "Serving {root} on http://{addr}",
            root = config.root.display()
        );

        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);

        Ok(Self {
            files: Arc::new(FileResponder::from_config(&config)),
            config: Arc::new(config),
            listener,
            stats: Arc::new(ServerStats::new()),
            shutdown_tx,
            shutdown_rx,
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        self.listener.local_addr().map_err(Error::SocketSetup)
    }

    /// The validated configuration the server runs with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn stats(&self) -> Arc<ServerStats> {
        self.stats.clone()
    }

    /// A handle that stops [`HttpServer::run`] from another task.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Set up a Ctrl+C handler for graceful shutdown.
    fn setup_ctrl_c_handler(handle: ShutdownHandle) {
        tokio::spawn(async move {
            match signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received Ctrl+C, initiating graceful shutdown");
                    handle.shutdown().await;
                }
                Err(e) => {
                    error!("Error setting up Ctrl+C handler: {e}");
                }
            }
        });
    }

    /// Run until Ctrl+C is received.
    pub async fn run_until_ctrl_c(self) -> Result<(), Error> {
        Self::setup_ctrl_c_handler(self.shutdown_handle());
        self.run().await
    }

    /// Accept connections until a shutdown is requested.
    ///
    /// Each connection is served on its own task. Accept errors are logged
    /// and the loop keeps going. On shutdown the listening socket is closed
    /// first, then in-flight connections are given time to finish.
    pub async fn run(self) -> Result<(), Error> {
        let Self {
            config,
            listener,
            files,
            stats,
            shutdown_tx,
            mut shutdown_rx,
        } = self;
        // Only external handles should be able to stop the loop
        drop(shutdown_tx);

        let semaphore = Arc::new(Semaphore::new(config.max_connections));
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                // Check for shutdown signal
                Some(()) = shutdown_rx.recv() => {
                    info!("Shutting down server...");
                    break;
                }

                // Accept new connections
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((socket, addr)) => {
                            stats.record_accepted();
                            Self::handle_new_connection(
                                socket,
                                addr,
                                semaphore.clone(),
                                config.clone(),
                                files.clone(),
                                stats.clone(),
                                &mut tasks,
                            );
                        }
                        Err(e) => Self::handle_accept_error(e).await,
                    }
                }
            }

            // Reap finished connections so the set stays small
            while let Some(res) = tasks.try_join_next() {
                if let Err(e) = res {
                    error!("Connection task failed: {e}");
                }
            }
        }

        drop(listener);
        info!("Listener closed");

        Self::perform_shutdown(&mut tasks).await;
        info!("{}", stats.snapshot());

        Ok(())
    }

    /// Handle a new connection.
    fn handle_new_connection(
        mut socket: TcpStream,
        addr: SocketAddr,
        semaphore: Arc<Semaphore>,
        config: Arc<ServerConfig>,
        files: Arc<FileResponder>,
        stats: Arc<ServerStats>,
        tasks: &mut JoinSet<()>,
    ) {
        // Try to acquire a permit from the semaphore
        let Ok(permit) = semaphore.try_acquire_owned() else {
            warn!("Connection limit reached, rejecting connection from {addr}");
            stats.record_rejected();
            tasks.spawn(async move {
                let response = HttpResponse::service_unavailable().with_header("Connection", "close");
                if let Err(e) = write_response(&mut socket, &response, config.write_timeout()).await {
                    debug!("Could not send 503 to {addr}: {e}");
                    return;
                }
                let _ = tokio::time::timeout(config.write_timeout(), socket.shutdown()).await;
                drain_request(&mut socket, &[]).await;
            });
            return;
        };

        tasks.spawn(async move {
            // The permit is dropped when the task completes, releasing the semaphore slot
            let _permit = permit;

            match handle_connection(socket, &config, &files).await {
                Ok(Some(status)) => {
                    stats.record_response(status);
                    debug!("Sent {status} to {addr}", status = status.as_u16());
                }
                Ok(None) => {
                    stats.record_dropped();
                    debug!("Connection from {addr} closed without a request");
                }
                Err(e) => {
                    stats.record_dropped();
                    warn!("Error handling connection from {addr}: {e}");
                }
            }
        });
    }

    /// Log an accept failure and back off briefly before retrying.
    async fn handle_accept_error(e: std::io::Error) {
        error!("{}", Error::Accept(e));
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
    }

    /// Perform graceful shutdown.
    async fn perform_shutdown(tasks: &mut JoinSet<()>) {
        // Wait for all tasks to complete (with timeout)
        info!("Waiting for {len} active connections to complete...", len = tasks.len());
        let shutdown_timeout = tokio::time::Duration::from_secs(30);
        let drained = tokio::time::timeout(shutdown_timeout, async {
            while let Some(res) = tasks.join_next().await {
                if let Err(e) = res {
                    error!("Task failed during shutdown: {e}");
                }
            }
        })
        .await;

        if drained.is_err() {
            warn!("Aborting {len} connections still open after {shutdown_timeout:?}", len = tasks.len());
            tasks.abort_all();
        }

        info!("Server shutdown complete");
    }
}
