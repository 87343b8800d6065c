//! UDP packet sender
//!
//! Owns the socket and the sequential send loop. Transport failures are its
//! own concern; they never reach the encoder.

use thiserror::Error;
use tokio::net::UdpSocket;

use super::SendConfig;
use crate::protocol::{encode_packet, Packet, PACKET_LEN};

/// Sender errors
#[derive(Error, Debug)]
pub enum SendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("short send: {0} of {PACKET_LEN} bytes")]
    ShortSend(usize),
}

pub type SendResult<T> = Result<T, SendError>;

/// Fire-and-forget UDP sender for wire packets
pub struct Sender {
    socket: UdpSocket,
    config: SendConfig,
}

impl Sender {
    /// Bind an ephemeral local socket and connect it to the target.
    pub async fn connect(config: SendConfig) -> SendResult<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(config.target).await?;
        tracing::info!(
            "sending from {} to {}",
            socket.local_addr()?,
            config.target
        );
        Ok(Self { socket, config })
    }

    /// Send one packet as a single datagram.
    pub async fn send(&self, packet: &Packet) -> SendResult<()> {
        let wire = encode_packet(packet);
        let sent = self.socket.send(&wire).await?;
        if sent != PACKET_LEN {
            return Err(SendError::ShortSend(sent));
        }
        tracing::debug!("sent {}", packet.describe());
        Ok(())
    }

    /// Send every packet in order, pausing between datagrams if configured.
    ///
    /// Returns the number of packets sent. Stops at the first transport
    /// error; packets already sent stay sent.
    pub async fn send_all(&self, packets: &[Packet]) -> SendResult<usize> {
        let mut sent = 0;
        for packet in packets {
            self.send(packet).await?;
            sent += 1;
            if let Some(pause) = self.config.pause {
                tokio::time::sleep(pause).await;
            }
        }
        tracing::info!("sent {} packets to {}", sent, self.config.target);
        Ok(sent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{generate, MatrixSpec};

    #[tokio::test]
    async fn test_send_matrix_to_local_listener() {
        // Stand-in for the server under test: a plain UDP socket.
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap();

        let packets = generate(&MatrixSpec::default());
        let sender = Sender::connect(SendConfig::new(target)).await.unwrap();
        let sent = sender.send_all(&packets).await.unwrap();
        assert_eq!(sent, 18);

        // Datagrams to loopback arrive intact and in order.
        let mut buf = [0u8; 64];
        for expected in &packets {
            let n = listener.recv(&mut buf).await.unwrap();
            assert_eq!(n, PACKET_LEN);
            assert_eq!(buf[..n], encode_packet(expected));
        }
    }

    #[tokio::test]
    async fn test_single_send_is_twelve_bytes() {
        let listener = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let target = listener.local_addr().unwrap();

        let packet = packets_sample();
        let sender = Sender::connect(SendConfig::new(target)).await.unwrap();
        sender.send(&packet).await.unwrap();

        let mut buf = [0u8; 64];
        let n = listener.recv(&mut buf).await.unwrap();
        assert_eq!(n, 12);
    }

    fn packets_sample() -> Packet {
        use crate::protocol::{Opcode, PROTOCOL_VERSION};
        Packet::new(PROTOCOL_VERSION, Opcode::Move, 0x1234, 60, Some(2)).unwrap()
    }
}
