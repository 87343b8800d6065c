//! Protocol module - Defines the RPS wire protocol
//!
//! Every packet is a fixed 12-byte datagram in network byte order:
//! - 1 byte protocol version
//! - 1 byte opcode
//! - 2 bytes game ID (big-endian)
//! - 4 bytes TTL (big-endian)
//! - 4 bytes opcode-dependent payload

mod message;
mod codec;

pub use message::*;
pub use codec::*;

/// Protocol version carried in every packet
pub const PROTOCOL_VERSION: u8 = 0x01;

/// Port the RPS server listens on
pub const DEFAULT_PORT: u16 = 50001;

/// Default time-to-live for generated packets (seconds)
pub const DEFAULT_TTL: u32 = 60;

/// Header size: version(1) + opcode(1) + game_id(2) + ttl(4)
pub const HEADER_LEN: usize = 8;

/// Payload size - every opcode carries exactly four bytes
pub const PAYLOAD_LEN: usize = 4;

/// Total wire size of a packet
pub const PACKET_LEN: usize = HEADER_LEN + PAYLOAD_LEN;

/// Payload bytes of an ERROR packet ("END!")
pub const ERROR_PAYLOAD: [u8; 4] = [0x45, 0x4E, 0x44, 0x21];
