use std::net::{SocketAddr, TcpStream};

use dabconfirm_frame::{FrameConfig, FrameReader, FrameWriter};
use dabconfirm_store::Confirmation;
use tracing::debug;

use crate::error::{Result, ServerError};
use crate::protocol::DISCONNECT_SENTINEL;
use crate::reply::AckReply;

/// Client side of the confirmation protocol: connect, send confirmations,
/// receive acknowledgments.
#[derive(Debug)]
pub struct ConfirmationClient {
    reader: FrameReader<TcpStream>,
    writer: FrameWriter<TcpStream>,
    peer_addr: SocketAddr,
}

impl ConfirmationClient {
    /// Connect with default framing parameters.
    pub fn connect(addr: SocketAddr) -> Result<Self> {
        Self::connect_with_config(addr, FrameConfig::default())
    }

    /// Connect with explicit framing parameters; configured timeouts are
    /// applied to the socket.
    pub fn connect_with_config(addr: SocketAddr, config: FrameConfig) -> Result<Self> {
        let stream =
            TcpStream::connect(addr).map_err(|source| ServerError::Connect { addr, source })?;
        let reader_stream = stream.try_clone()?;
        let reader = FrameReader::with_config_tcp(reader_stream, config.clone())?;
        let writer = FrameWriter::with_config_tcp(stream, config)?;
        debug!(addr = %addr, "connected");

        Ok(Self {
            reader,
            writer,
            peer_addr: addr,
        })
    }

    /// Send one confirmation and block until the acknowledgment arrives.
    pub fn confirm(&mut self, confirmation: &Confirmation) -> Result<AckReply> {
        self.writer
            .write_frame(&serde_json::to_vec(confirmation)?)?;
        let payload = self.reader.read_frame()?;
        Ok(serde_json::from_slice(&payload)?)
    }

    /// Announce the end of the session and close the connection without
    /// waiting for a reply.
    pub fn disconnect(mut self) -> Result<()> {
        self.writer
            .write_frame(&serde_json::to_vec(DISCONNECT_SENTINEL)?)?;
        Ok(())
    }

    /// Address of the server this client is connected to.
    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }
}
