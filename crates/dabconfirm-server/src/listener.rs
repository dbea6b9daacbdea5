use std::fmt;
use std::io;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

use dabconfirm_frame::{FrameConfig, FrameReader, FrameWriter};
use dabconfirm_store::ConfirmationStore;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::display::SnapshotDisplay;
use crate::error::{Result, ServerError};
use crate::handler::{run_session, SessionContext, SessionEnd};

/// Listens for confirming clients and runs one handler thread per
/// accepted connection.
pub struct ConfirmationServer {
    listener: TcpListener,
    frame_config: FrameConfig,
    ctx: SessionContext,
    active: Arc<AtomicUsize>,
}

impl ConfirmationServer {
    /// Bind the listening socket described by `config`.
    pub fn bind(config: ServerConfig, store: Arc<ConfirmationStore>) -> Result<Self> {
        let listener = TcpListener::bind(config.bind_addr).map_err(|source| ServerError::Bind {
            addr: config.bind_addr,
            source,
        })?;
        info!(addr = %listener.local_addr()?, "server listening");

        Ok(Self {
            listener,
            frame_config: config.frame,
            ctx: SessionContext::new(store, config.reply_policy),
            active: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Attach a display collaborator refreshed after each handled
    /// confirmation.
    pub fn with_display(mut self, display: Arc<dyn SnapshotDisplay>) -> Self {
        self.ctx = self.ctx.with_display(display);
        self
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Number of connections currently being handled.
    pub fn active_connections(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    /// Accept connections until `shutdown` flips true.
    ///
    /// The flag is checked between accepts: a blocked accept observes it
    /// on the next incoming connection or when a signal interrupts the
    /// call. Individual accept failures are logged and never take the
    /// listener down.
    pub fn run_until(&self, shutdown: &AtomicBool) -> Result<()> {
        while !shutdown.load(Ordering::SeqCst) {
            match self.accept_one() {
                Ok((stream, peer)) => self.spawn_handler(stream, peer),
                Err(ServerError::Accept(err)) if err.kind() == io::ErrorKind::Interrupted => {
                    continue
                }
                Err(err) => warn!(error = %err, "accept failed"),
            }
        }
        info!("listener shutting down");
        Ok(())
    }

    /// Accept connections forever.
    pub fn run(&self) -> Result<()> {
        let never = AtomicBool::new(false);
        self.run_until(&never)
    }

    fn accept_one(&self) -> Result<(TcpStream, SocketAddr)> {
        self.listener.accept().map_err(ServerError::Accept)
    }

    /// The single place handler threads are spawned.
    fn spawn_handler(&self, stream: TcpStream, peer: SocketAddr) {
        let ctx = self.ctx.clone();
        let frame_config = self.frame_config.clone();
        let active = Arc::clone(&self.active);

        let now_active = active.fetch_add(1, Ordering::SeqCst) + 1;
        info!(peer = %peer, active_connections = now_active, "client connected");

        let spawned = thread::Builder::new()
            .name(format!("conn-{peer}"))
            .spawn(move || {
                handle_connection(stream, peer, &ctx, frame_config);
                let remaining = active.fetch_sub(1, Ordering::SeqCst) - 1;
                info!(peer = %peer, active_connections = remaining, "connection finished");
            });

        if let Err(err) = spawned {
            self.active.fetch_sub(1, Ordering::SeqCst);
            warn!(peer = %peer, error = %err, "spawning handler thread failed");
        }
    }
}

// Manual impl: `ctx` holds a `dyn SnapshotDisplay` collaborator, which
// keeps `SessionContext` out of `#[derive(Debug)]` reach.
impl fmt::Debug for ConfirmationServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationServer")
            .field("listener", &self.listener)
            .field("frame_config", &self.frame_config)
            .field("active", &self.active)
            .finish_non_exhaustive()
    }
}

fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: &SessionContext,
    frame_config: FrameConfig,
) {
    match drive_session(stream, peer, ctx, frame_config) {
        Ok(SessionEnd::PeerClosed) => info!(peer = %peer, "peer closed connection"),
        Ok(SessionEnd::DisconnectRequested) => info!(peer = %peer, "peer requested disconnect"),
        Err(ServerError::Store(err)) => {
            // The record was inserted or found in the same handling step.
            error!(peer = %peer, error = %err, "acknowledged record missing from store");
        }
        Err(err) => warn!(peer = %peer, error = %err, "session ended on protocol error"),
    }
}

fn drive_session(
    stream: TcpStream,
    peer: SocketAddr,
    ctx: &SessionContext,
    frame_config: FrameConfig,
) -> Result<SessionEnd> {
    let reader_stream = stream.try_clone()?;
    let mut reader = FrameReader::with_config_tcp(reader_stream, frame_config.clone())?;
    let mut writer = FrameWriter::with_config_tcp(stream, frame_config)?;
    run_session(&mut reader, &mut writer, peer, ctx)
}
