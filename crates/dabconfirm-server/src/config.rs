use std::net::SocketAddr;
use std::time::Duration;

use dabconfirm_frame::FrameConfig;

use crate::reply::ReplyPolicy;

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 9000;

/// Runtime configuration for the confirmation server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the TCP listener binds.
    pub bind_addr: SocketAddr,
    /// Framing parameters applied to every accepted connection.
    pub frame: FrameConfig,
    /// How acknowledgment payloads correlate stored confirmations.
    pub reply_policy: ReplyPolicy,
}

impl ServerConfig {
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            frame: FrameConfig::default(),
            reply_policy: ReplyPolicy::default(),
        }
    }

    /// Override the reply correlation policy.
    pub fn with_reply_policy(mut self, policy: ReplyPolicy) -> Self {
        self.reply_policy = policy;
        self
    }

    /// Override the framing parameters.
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    /// Socket read timeout for accepted connections. `None` (the default)
    /// keeps reads blocking until data arrives or the peer closes.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame.read_timeout = timeout;
        self
    }

    /// Socket write timeout for accepted connections.
    pub fn with_write_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.frame.write_timeout = timeout;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)))
    }
}
