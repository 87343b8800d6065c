//! Network module - UDP transmission of generated packets
//!
//! Thin shim over the encoder: packets are serialized and fired at the
//! target as independent datagrams, fire-and-forget. No responses are read
//! and no delivery guarantee is made; generation order is the only ordering
//! that holds.

mod sender;

pub use sender::*;

use std::net::SocketAddr;
use std::time::Duration;

/// Configuration for a send run
#[derive(Debug, Clone)]
pub struct SendConfig {
    /// Destination host and port
    pub target: SocketAddr,
    /// Pause between datagrams, if any
    pub pause: Option<Duration>,
}

impl SendConfig {
    pub fn new(target: SocketAddr) -> Self {
        Self {
            target,
            pause: None,
        }
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = Some(pause);
        self
    }
}
