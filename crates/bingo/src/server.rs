//! `BingoServer` builder and server loop.
//!
//! This is the entry point for running the bingo hall. It ties together
//! all the layers: transport → protocol → session → hub.

use std::sync::Arc;

use bingo_game::{GameSchedule, StaticGameSchedule};
use bingo_protocol::{Codec, JsonCodec};
use bingo_session::Authenticator;
use bingo_transport::{Transport, WebSocketTransport};

use crate::handler::handle_connection;
use crate::{BingoError, GameController, HubConfig, SessionHub};

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState<A: Authenticator, C: Codec> {
    pub(crate) hub: Arc<SessionHub<C>>,
    pub(crate) auth: A,
}

/// Builder for configuring and starting the bingo hall server.
///
/// # Example
///
/// ```rust,no_run
/// use bingo::prelude::*;
///
/// # async fn run() -> Result<(), BingoError> {
/// let server = BingoServerBuilder::new()
///     .bind("0.0.0.0:8080")
///     .schedule(StaticGameSchedule::new(20, 0))
///     .build(TrustedNameAuthenticator)
///     .await?;
/// let controller = server.controller();
/// server.run().await
/// # }
/// ```
pub struct BingoServerBuilder {
    bind_addr: String,
    hub_config: HubConfig,
    schedule: Box<dyn GameSchedule>,
}

impl BingoServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            hub_config: HubConfig::default(),
            schedule: Box::new(StaticGameSchedule::default()),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the hub configuration.
    pub fn hub_config(mut self, config: HubConfig) -> Self {
        self.hub_config = config;
        self
    }

    /// Sets where the next game time comes from.
    pub fn schedule(mut self, schedule: impl GameSchedule) -> Self {
        self.schedule = Box::new(schedule);
        self
    }

    /// Binds the listener and builds the server with the given
    /// authenticator.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport`.
    pub async fn build<A: Authenticator>(
        self,
        auth: A,
    ) -> Result<BingoServer<A, JsonCodec>, BingoError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;
        let hub = Arc::new(SessionHub::new(self.hub_config, self.schedule));
        let state = Arc::new(ServerState { hub, auth });
        Ok(BingoServer { transport, state })
    }
}

impl Default for BingoServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound bingo hall server.
///
/// Grab a [`controller()`](Self::controller) for the operator first,
/// then call [`run()`](Self::run) to start accepting connections.
pub struct BingoServer<A: Authenticator, C: Codec = JsonCodec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<A, C>>,
}

impl<A, C> BingoServer<A, C>
where
    A: Authenticator,
    C: Codec,
{
    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// The hub, for read operations such as cards and the status summary.
    pub fn hub(&self) -> Arc<SessionHub<C>> {
        Arc::clone(&self.state.hub)
    }

    /// An operator handle for drawing balls and resetting the game.
    pub fn controller(&self) -> GameController<C> {
        GameController::new(self.hub())
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming peers and spawns a handler task for each. The
    /// WebSocket upgrade runs inside that task, so a slow peer never
    /// holds up the loop. Runs until the process is terminated.
    pub async fn run(mut self) -> Result<(), BingoError> {
        tracing::info!("bingo hall running");

        loop {
            match self.transport.accept().await {
                Ok(handshake) => {
                    let state = Arc::clone(&self.state);
                    let addr = handshake.peer_addr();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(handshake, state).await {
                            tracing::debug!(
                                %addr,
                                error = %e,
                                "connection ended with error"
                            );
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}
