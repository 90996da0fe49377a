// Server module entry
// Explicit server object: bind, accept loop, graceful stop

pub mod connection;
pub mod listener;
pub mod shutdown;
pub mod signal;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::AppState;
use crate::logger;

pub use listener::create_reusable_listener;
pub use signal::start_signal_handler;

/// A bound HTTP server that has not started accepting yet
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    shutdown: Arc<watch::Sender<bool>>,
}

/// Cheap handle used to stop a running [`Server`]
#[derive(Clone)]
pub struct ServerHandle {
    shutdown: Arc<watch::Sender<bool>>,
}

impl ServerHandle {
    /// Ask the server to stop accepting and wind down. Idempotent, and
    /// effective even if called before the server starts running.
    pub fn stop(&self) {
        if !self.shutdown.send_replace(true) {
            logger::log_info("[Shutdown] Stop requested");
        }
    }
}

/// Resolves once the stop flag is set (or the server is gone)
async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

impl Server {
    /// Bind the listener on `server.host:server.port`
    pub fn bind(state: Arc<AppState>) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let addr = state.config.get_socket_addr()?;
        let listener = create_reusable_listener(addr)?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            listener,
            state,
            active_connections: Arc::new(AtomicUsize::new(0)),
            shutdown: Arc::new(shutdown),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn handle(&self) -> ServerHandle {
        ServerHandle {
            shutdown: Arc::clone(&self.shutdown),
        }
    }

    /// Run the accept loop on a background task
    #[allow(dead_code)] // Used in tests
    pub fn start(self) -> (ServerHandle, JoinHandle<()>) {
        let handle = self.handle();
        (handle, tokio::spawn(self.run()))
    }

    /// Accept connections until stopped, then wait for in-flight
    /// connections for up to `performance.shutdown_grace` seconds.
    pub async fn run(self) {
        let Self {
            listener,
            state,
            active_connections,
            shutdown,
        } = self;

        let mut stop = shutdown.subscribe();
        let conn_stop = shutdown.subscribe();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, peer_addr)) => {
                            connection::accept_connection(
                                stream,
                                peer_addr,
                                &state,
                                &active_connections,
                                conn_stop.clone(),
                            );
                        }
                        Err(e) => {
                            logger::log_error(&format!("Failed to accept connection: {e}"));
                        }
                    }
                }

                () = stopped(&mut stop) => break,
            }
        }

        drop(listener);
        logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));

        let grace = Duration::from_secs(state.config.performance.shutdown_grace);
        let remaining = shutdown::drain_connections(&active_connections, grace).await;
        logger::log_shutdown_complete(remaining);
    }
}
