//! Protocol message definitions
//!
//! Models the header fields and the opcode-dependent payload of an RPS
//! packet. Construction validates sub-options, so any `Packet` value can be
//! put on the wire as-is.

use super::codec::CodecError;
use super::ERROR_PAYLOAD;

/// Packet type identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Session start
    Init = 0x01,
    /// A player's move (rock/paper/scissors)
    Move = 0x02,
    /// Round outcome (win/loss/draw)
    Result = 0x03,
    /// Acknowledgment
    Ack = 0x04,
    /// Error notification, payload "END!"
    Error = 0x05,
}

impl Opcode {
    /// All opcodes in canonical wire order
    pub const ALL: [Opcode; 5] = [
        Opcode::Init,
        Opcode::Move,
        Opcode::Result,
        Opcode::Ack,
        Opcode::Error,
    ];

    /// Parse an opcode byte, rejecting anything outside the closed set
    pub fn from_byte(byte: u8) -> Result<Self, CodecError> {
        match byte {
            0x01 => Ok(Opcode::Init),
            0x02 => Ok(Opcode::Move),
            0x03 => Ok(Opcode::Result),
            0x04 => Ok(Opcode::Ack),
            0x05 => Ok(Opcode::Error),
            other => Err(CodecError::InvalidOpcode(other)),
        }
    }

    /// Sub-option values applicable to this opcode.
    ///
    /// Empty means the opcode takes no sub-option and maps to exactly one
    /// packet shape. The generator iterates this table instead of
    /// special-casing each opcode.
    pub fn sub_options(&self) -> &'static [u8] {
        match self {
            Opcode::Move | Opcode::Result => &[1, 2, 3],
            Opcode::Init | Opcode::Ack | Opcode::Error => &[],
        }
    }

    /// Display name matching the server's dissector
    pub fn name(&self) -> &'static str {
        match self {
            Opcode::Init => "INIT",
            Opcode::Move => "MOVE",
            Opcode::Result => "RESULT",
            Opcode::Ack => "ACK",
            Opcode::Error => "ERROR",
        }
    }
}

/// Move choices carried by MOVE packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Move {
    Rock = 1,
    Paper = 2,
    Scissors = 3,
}

impl Move {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Move::Rock),
            2 => Some(Move::Paper),
            3 => Some(Move::Scissors),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Move::Rock => "Rock",
            Move::Paper => "Paper",
            Move::Scissors => "Scissors",
        }
    }
}

/// Round outcomes carried by RESULT packets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Outcome {
    Win = 1,
    Loss = 2,
    Draw = 3,
}

impl Outcome {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            1 => Some(Outcome::Win),
            2 => Some(Outcome::Loss),
            3 => Some(Outcome::Draw),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Win => "Win",
            Outcome::Loss => "Loss",
            Outcome::Draw => "Draw",
        }
    }
}

/// Fixed 8-byte packet header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Protocol version
    pub version: u8,
    /// Packet type
    pub opcode: Opcode,
    /// Logical game session this packet belongs to
    pub game_id: u16,
    /// Time-to-live; always 4 bytes on the wire even for small values
    pub ttl: u32,
}

/// Opcode-dependent 4-byte payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload {
    /// Four zero bytes (INIT, ACK)
    Padding,
    /// Move choice as a big-endian u32 (MOVE)
    Move(Move),
    /// Round outcome as a big-endian u32 (RESULT)
    Result(Outcome),
    /// The literal bytes "END!" (ERROR)
    End,
}

impl Payload {
    /// Build the payload for `opcode`, validating that `sub_option` is
    /// present exactly when the opcode requires one and within range.
    pub fn for_opcode(opcode: Opcode, sub_option: Option<u8>) -> Result<Self, CodecError> {
        match (opcode, sub_option) {
            (Opcode::Init | Opcode::Ack, None) => Ok(Payload::Padding),
            (Opcode::Error, None) => Ok(Payload::End),
            (Opcode::Move, Some(value)) => Move::from_byte(value)
                .map(Payload::Move)
                .ok_or(CodecError::InvalidSubOption { opcode, value }),
            (Opcode::Result, Some(value)) => Outcome::from_byte(value)
                .map(Payload::Result)
                .ok_or(CodecError::InvalidSubOption { opcode, value }),
            (Opcode::Move | Opcode::Result, None) => Err(CodecError::MissingSubOption(opcode)),
            (_, Some(value)) => Err(CodecError::UnexpectedSubOption { opcode, value }),
        }
    }

    /// Serialize to the fixed 4-byte wire form
    pub fn to_bytes(&self) -> [u8; 4] {
        match self {
            Payload::Padding => [0; 4],
            Payload::Move(m) => (*m as u32).to_be_bytes(),
            Payload::Result(o) => (*o as u32).to_be_bytes(),
            Payload::End => ERROR_PAYLOAD,
        }
    }

    /// The sub-option this payload carries, if any
    pub fn sub_option(&self) -> Option<u8> {
        match self {
            Payload::Move(m) => Some(*m as u8),
            Payload::Result(o) => Some(*o as u8),
            Payload::Padding | Payload::End => None,
        }
    }
}

/// A complete, validated RPS packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet {
    pub header: Header,
    pub payload: Payload,
}

impl Packet {
    /// Build a packet from raw parameters, validating the
    /// opcode/sub-option combination.
    pub fn new(
        version: u8,
        opcode: Opcode,
        game_id: u16,
        ttl: u32,
        sub_option: Option<u8>,
    ) -> Result<Self, CodecError> {
        let payload = Payload::for_opcode(opcode, sub_option)?;
        Ok(Self {
            header: Header {
                version,
                opcode,
                game_id,
                ttl,
            },
            payload,
        })
    }

    /// One-line human-readable summary of the packet's fields
    pub fn describe(&self) -> String {
        let detail = match self.payload {
            Payload::Padding => "padding".to_string(),
            Payload::Move(m) => format!("move={}", m.name()),
            Payload::Result(o) => format!("result={}", o.name()),
            Payload::End => "message=END!".to_string(),
        };
        format!(
            "{} v{} game=0x{:04X} ttl={} {}",
            self.header.opcode.name(),
            self.header.version,
            self.header.game_id,
            self.header.ttl,
            detail
        )
    }
}
