use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::http::connection::{Connection, ConnectionContext};
use crate::server::gate::ConnectionGate;
use crate::server::shutdown::Shutdown;

/// Accept loop.
///
/// Reserves a gate slot before accepting. The accepted client is admitted
/// into that slot and served on its own task while the loop goes back to
/// waiting. Accept errors are logged and the loop keeps listening. Returns
/// once the shutdown signal fires.
pub async fn run(
    listener: TcpListener,
    gate: ConnectionGate,
    ctx: Arc<ConnectionContext>,
    shutdown: Shutdown,
    tracker: TaskTracker,
) {
    if let Ok(addr) = listener.local_addr() {
        info!("Listening on {}", addr);
    }

    while shutdown.is_running() {
        debug!("Waiting for connection");

        let slot = tokio::select! {
            slot = gate.acquire() => match slot {
                Ok(slot) => slot,
                Err(_) => break,
            },
            _ = shutdown.cancelled() => break,
        };

        let (socket, peer) = tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    continue;
                }
            },
            _ = shutdown.cancelled() => break,
        };

        if !shutdown.is_running() {
            debug!(peer = %peer, "Refusing connection during shutdown");
            break;
        }

        let permit = gate.admit(slot);
        info!(
            peer = %peer,
            active = permit.active(),
            available = gate.available(),
            "Accepted connection"
        );

        let ctx = Arc::clone(&ctx);
        let shutdown = shutdown.clone();
        tracker.spawn(async move {
            let conn = Connection::new(socket, peer, permit, ctx);
            tokio::select! {
                _ = conn.run() => {}
                _ = shutdown.cancelled() => {
                    debug!(peer = %peer, "Connection aborted by shutdown");
                }
            }
        });
    }

    info!("Accept loop stopped");
}
