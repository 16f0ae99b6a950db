//! Per-connection handler: identity, read loop, and writer task.
//!
//! Each accepted connection gets its own Tokio task running
//! [`handle_connection`]. The flow is:
//!   1. Finish the WebSocket upgrade within `handshake_timeout`
//!   2. Resolve identity from the handshake token (guest fallback)
//!   3. Join the hub → everyone gets a presence snapshot
//!   4. Spawn the writer: drains the outbound channel onto the socket
//!   5. Loop: receive frames → hub
//!   6. On exit, the guard leaves the hub

use std::sync::Arc;

use bingo_protocol::Codec;
use bingo_room::EventReceiver;
use bingo_session::{resolve_identity, Authenticator};
use bingo_transport::{
    Connection, ConnectionId, Handshake, TransportError, WebSocketConnection,
    WebSocketHandshake,
};
use tokio::sync::mpsc;

use crate::server::ServerState;
use crate::{BingoError, SessionHub};

/// Drop guard that removes the connection from the hub when the handler
/// exits.
///
/// Runs even if the handler panics. `Drop` is synchronous, so the async
/// cleanup is spawned.
struct ConnectionGuard<C: Codec> {
    conn_id: ConnectionId,
    hub: Arc<SessionHub<C>>,
}

impl<C: Codec> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        let conn_id = self.conn_id;
        let hub = Arc::clone(&self.hub);
        tokio::spawn(async move {
            hub.disconnect(conn_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
///
/// A peer that stalls its upgrade past `handshake_timeout` is dropped
/// with [`TransportError::Timeout`] before it ever joins the room.
pub(crate) async fn handle_connection<A, C>(
    handshake: WebSocketHandshake,
    state: Arc<ServerState<A, C>>,
) -> Result<(), BingoError>
where
    A: Authenticator,
    C: Codec,
{
    let handshake_timeout = state.hub.config().handshake_timeout;
    let conn = tokio::time::timeout(handshake_timeout, handshake.complete())
        .await
        .map_err(|_| TransportError::Timeout)??;

    let identity = resolve_identity(&state.auth, conn.token()).await;
    let hub = Arc::clone(&state.hub);
    let conn = Arc::new(conn);

    let (tx, rx) = mpsc::unbounded_channel();
    let conn_id = hub.connect(identity, tx).await;
    let _guard = ConnectionGuard {
        conn_id,
        hub: Arc::clone(&hub),
    };

    let mut writer = tokio::spawn(write_loop(
        Arc::clone(&conn),
        Arc::clone(&hub),
        rx,
        conn_id,
    ));

    // Players who only watch never send anything; the connection lives
    // until the socket closes or the writer gives up.
    loop {
        tokio::select! {
            _ = &mut writer => {
                tracing::debug!(%conn_id, "writer stopped, closing");
                break;
            }
            result = conn.recv() => {
                let data = match result {
                    Ok(Some(data)) => data,
                    Ok(None) => {
                        tracing::info!(%conn_id, "connection closed cleanly");
                        break;
                    }
                    Err(e) => {
                        tracing::debug!(%conn_id, error = %e, "recv error");
                        break;
                    }
                };

                if let Err(e) = hub.handle_frame(conn_id, &data).await {
                    tracing::debug!(%conn_id, error = %e, "frame rejected");
                }
            }
        }
    }

    writer.abort();
    conn.close().await?;
    // _guard drops here → hub disconnect fires.
    Ok(())
}

/// Sends every event queued for this connection, in order.
///
/// Stops on the first failed or timed-out send. Dropping the receiver
/// then makes the next broadcast drop this member from the room.
async fn write_loop<C: Codec>(
    conn: Arc<WebSocketConnection>,
    hub: Arc<SessionHub<C>>,
    mut events: EventReceiver,
    conn_id: ConnectionId,
) {
    let send_timeout = hub.config().send_timeout;

    while let Some(event) = events.recv().await {
        let text = match hub.codec().encode(&event) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode event");
                continue;
            }
        };

        match tokio::time::timeout(send_timeout, conn.send(&text)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::debug!(%conn_id, error = %e, "send failed");
                break;
            }
            Err(_) => {
                tracing::warn!(%conn_id, "send timed out");
                break;
            }
        }
    }
}
