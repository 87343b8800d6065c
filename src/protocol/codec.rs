//! Protocol codec for encoding/decoding packets
//!
//! The encoder is a pure function: it either produces the exact 12-byte
//! wire form or returns a typed error. It never emits a short or
//! partially-valid packet.

use bytes::{Buf, BufMut, BytesMut};
use thiserror::Error;

use super::{Header, Opcode, Packet, Payload, ERROR_PAYLOAD, PACKET_LEN};

/// Codec errors
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),

    #[error("invalid sub-option {value} for {}", .opcode.name())]
    InvalidSubOption { opcode: Opcode, value: u8 },

    #[error("{} takes no sub-option (got {value})", .opcode.name())]
    UnexpectedSubOption { opcode: Opcode, value: u8 },

    #[error("{} requires a sub-option", .0.name())]
    MissingSubOption(Opcode),

    #[error("wrong packet length: {0} bytes (expected {PACKET_LEN})")]
    WrongLength(usize),

    #[error("invalid payload for {}", .0.name())]
    InvalidPayload(Opcode),
}

pub type CodecResult<T> = Result<T, CodecError>;

/// Encode raw packet parameters into the 12-byte wire form.
///
/// The opcode is taken as a raw byte so callers probing the protocol can
/// pass arbitrary values; anything outside the closed set is rejected.
pub fn encode(
    version: u8,
    opcode: u8,
    game_id: u16,
    ttl: u32,
    sub_option: Option<u8>,
) -> CodecResult<[u8; PACKET_LEN]> {
    let opcode = Opcode::from_byte(opcode)?;
    let packet = Packet::new(version, opcode, game_id, ttl, sub_option)?;
    Ok(encode_packet(&packet))
}

/// Encode a validated packet. Infallible: `Packet` construction already
/// checked the opcode/sub-option combination.
pub fn encode_packet(packet: &Packet) -> [u8; PACKET_LEN] {
    let mut buf = BytesMut::with_capacity(PACKET_LEN);
    buf.put_u8(packet.header.version);
    buf.put_u8(packet.header.opcode as u8);
    buf.put_u16(packet.header.game_id);
    buf.put_u32(packet.header.ttl);
    buf.put_slice(&packet.payload.to_bytes());

    let mut wire = [0u8; PACKET_LEN];
    wire.copy_from_slice(&buf);
    wire
}

/// Decode a 12-byte wire packet back into its fields.
///
/// Inverse of [`encode_packet`] for every valid packet.
pub fn decode(bytes: &[u8]) -> CodecResult<Packet> {
    if bytes.len() != PACKET_LEN {
        return Err(CodecError::WrongLength(bytes.len()));
    }

    let mut buf = bytes;
    let version = buf.get_u8();
    let opcode = Opcode::from_byte(buf.get_u8())?;
    let game_id = buf.get_u16();
    let ttl = buf.get_u32();

    let payload = match opcode {
        Opcode::Init | Opcode::Ack => {
            if buf != &[0u8; 4][..] {
                return Err(CodecError::InvalidPayload(opcode));
            }
            Payload::Padding
        }
        Opcode::Move | Opcode::Result => match u8::try_from(buf.get_u32()) {
            Ok(value) => Payload::for_opcode(opcode, Some(value))?,
            Err(_) => return Err(CodecError::InvalidPayload(opcode)),
        },
        Opcode::Error => {
            if buf != &ERROR_PAYLOAD[..] {
                return Err(CodecError::InvalidPayload(opcode));
            }
            Payload::End
        }
    };

    Ok(Packet {
        header: Header {
            version,
            opcode,
            game_id,
            ttl,
        },
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Move, Outcome, PROTOCOL_VERSION};

    #[test]
    fn test_move_packet_wire_bytes() {
        let wire = encode(PROTOCOL_VERSION, 0x02, 0x1234, 60, Some(2)).unwrap();
        assert_eq!(
            wire,
            [0x01, 0x02, 0x12, 0x34, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x02]
        );
    }

    #[test]
    fn test_error_packet_wire_bytes() {
        let wire = encode(PROTOCOL_VERSION, 0x05, 0x1212, 60, None).unwrap();
        assert_eq!(
            wire,
            [0x01, 0x05, 0x12, 0x12, 0x00, 0x00, 0x00, 0x3C, 0x45, 0x4E, 0x44, 0x21]
        );
    }

    #[test]
    fn test_all_valid_packets_are_twelve_bytes() {
        for opcode in Opcode::ALL {
            let subs = opcode.sub_options();
            let variants: Vec<Option<u8>> = if subs.is_empty() {
                vec![None]
            } else {
                subs.iter().map(|s| Some(*s)).collect()
            };
            for sub in variants {
                let wire = encode(PROTOCOL_VERSION, opcode as u8, 0xABCD, 60, sub).unwrap();
                assert_eq!(wire.len(), PACKET_LEN);
                assert_eq!(wire[0], PROTOCOL_VERSION);
                assert_eq!(wire[1], opcode as u8);
                assert_eq!(u16::from_be_bytes([wire[2], wire[3]]), 0xABCD);
                assert_eq!(u32::from_be_bytes([wire[4], wire[5], wire[6], wire[7]]), 60);
            }
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let packets = [
            Packet::new(PROTOCOL_VERSION, Opcode::Init, 0x1234, 60, None).unwrap(),
            Packet::new(PROTOCOL_VERSION, Opcode::Move, 0x1234, 60, Some(1)).unwrap(),
            Packet::new(PROTOCOL_VERSION, Opcode::Result, 0x1212, 60, Some(3)).unwrap(),
            Packet::new(PROTOCOL_VERSION, Opcode::Ack, 0x1212, 60, None).unwrap(),
            Packet::new(PROTOCOL_VERSION, Opcode::Error, 0xFFFF, 1000, None).unwrap(),
        ];
        for original in packets {
            let wire = encode_packet(&original);
            let decoded = decode(&wire).unwrap();
            assert_eq!(decoded, original);
        }
    }

    #[test]
    fn test_ttl_full_width() {
        // Values above one byte must survive the 4-byte wire field intact.
        let packet = Packet::new(PROTOCOL_VERSION, Opcode::Init, 0x1234, 0x0001_86A0, None).unwrap();
        let wire = encode_packet(&packet);
        assert_eq!(&wire[4..8], &[0x00, 0x01, 0x86, 0xA0]);
        assert_eq!(decode(&wire).unwrap().header.ttl, 100_000);
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        assert_eq!(decode(&[0u8; 5]), Err(CodecError::WrongLength(5)));

        let mut wire = encode_packet(
            &Packet::new(PROTOCOL_VERSION, Opcode::Init, 0x1234, 60, None).unwrap(),
        );
        wire[1] = 0x09;
        assert_eq!(decode(&wire), Err(CodecError::InvalidOpcode(0x09)));

        // INIT with a non-zero payload byte
        let mut wire = encode_packet(
            &Packet::new(PROTOCOL_VERSION, Opcode::Init, 0x1234, 60, None).unwrap(),
        );
        wire[11] = 0x01;
        assert_eq!(decode(&wire), Err(CodecError::InvalidPayload(Opcode::Init)));

        // MOVE with an out-of-range choice
        let mut wire = encode_packet(
            &Packet::new(PROTOCOL_VERSION, Opcode::Move, 0x1234, 60, Some(1)).unwrap(),
        );
        wire[11] = 0x07;
        assert!(matches!(
            decode(&wire),
            Err(CodecError::InvalidSubOption { value: 7, .. })
        ));
    }

    #[test]
    fn test_distinct_sub_option_payloads() {
        let rock = encode_packet(
            &Packet::new(PROTOCOL_VERSION, Opcode::Move, 0x1234, 60, Some(Move::Rock as u8))
                .unwrap(),
        );
        let paper = encode_packet(
            &Packet::new(PROTOCOL_VERSION, Opcode::Move, 0x1234, 60, Some(Move::Paper as u8))
                .unwrap(),
        );
        let scissors = encode_packet(
            &Packet::new(
                PROTOCOL_VERSION,
                Opcode::Move,
                0x1234,
                60,
                Some(Move::Scissors as u8),
            )
            .unwrap(),
        );
        assert_ne!(&rock[8..], &paper[8..]);
        assert_ne!(&paper[8..], &scissors[8..]);
        assert_ne!(&rock[8..], &scissors[8..]);

        let win = Packet::new(PROTOCOL_VERSION, Opcode::Result, 0x1234, 60, Some(1)).unwrap();
        assert_eq!(win.payload, crate::protocol::Payload::Result(Outcome::Win));
    }
}
