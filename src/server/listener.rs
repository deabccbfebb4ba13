use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::StaticFilesConfig;
use crate::http::connection::Connection;

/// Pause after a failed accept before trying again.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept loop that hands every connection to its own task.
pub struct Listener {
    listener: TcpListener,
    static_files: Arc<StaticFilesConfig>,
}

impl Listener {
    /// Binds the listening socket. Failure here is fatal for the server.
    pub async fn bind(addr: &str, static_files: StaticFilesConfig) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;

        Ok(Self {
            listener,
            static_files: Arc::new(static_files),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts until `stop` turns true (or its sender is dropped).
    ///
    /// The listening socket is closed as soon as the stop is observed; the
    /// call then waits for every in-flight connection to finish.
    pub async fn run(self, mut stop: watch::Receiver<bool>) -> anyhow::Result<()> {
        let Listener {
            listener,
            static_files,
        } = self;

        info!(
            "Listening on {} serving {}",
            listener.local_addr()?,
            static_files.root.display()
        );

        // every task holds a sender; recv() yields None once all are dropped
        let (done_tx, mut done_rx) = mpsc::channel::<()>(1);

        while !*stop.borrow() {
            tokio::select! {
                biased;

                _ = stop.changed() => break,

                res = listener.accept() => {
                    let (socket, peer) = match res {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            if !*stop.borrow() {
                                warn!("Accept failed: {}", e);
                            }
                            // e.g. EMFILE persists until a connection closes
                            sleep(ACCEPT_BACKOFF).await;
                            continue;
                        }
                    };

                    let static_files = Arc::clone(&static_files);
                    let done = done_tx.clone();
                    tokio::spawn(async move {
                        let mut conn = Connection::new(socket, peer, static_files);
                        if let Err(e) = conn.run().await {
                            error!("Connection error from {}: {:#}", peer, e);
                        }
                        drop(done);
                    });
                }
            }
        }

        drop(listener);
        info!("Stopped accepting connections, waiting for in-flight requests");

        drop(done_tx);
        let _ = done_rx.recv().await;

        info!("Server stopped");
        Ok(())
    }
}
