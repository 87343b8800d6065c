//! Test-matrix generation
//!
//! Enumerates every packet shape the protocol defines: for each configured
//! game, one packet per opcode/sub-option combination. The resulting
//! sequence is what gets fired at a server under test to exercise all of
//! its decode paths.

use crate::protocol::{Opcode, Packet, DEFAULT_TTL, PROTOCOL_VERSION};

/// Parameters for one matrix run
#[derive(Debug, Clone)]
pub struct MatrixSpec {
    /// Protocol version stamped into every header
    pub version: u8,
    /// TTL stamped into every header
    pub ttl: u32,
    /// Game sessions to generate packets for, in output order
    pub game_ids: Vec<u16>,
    /// Raw opcode bytes to enumerate, in output order. Raw so a spec can
    /// deliberately include junk values; those are skipped with a warning.
    pub opcodes: Vec<u8>,
}

impl Default for MatrixSpec {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION,
            ttl: DEFAULT_TTL,
            game_ids: vec![0x1234, 0x1212],
            opcodes: Opcode::ALL.iter().map(|op| *op as u8).collect(),
        }
    }
}

impl MatrixSpec {
    /// Number of packets a full run will produce (junk opcodes count zero)
    pub fn packet_count(&self) -> usize {
        let per_game: usize = self
            .opcodes
            .iter()
            .filter_map(|byte| Opcode::from_byte(*byte).ok())
            .map(|op| op.sub_options().len().max(1))
            .sum();
        self.game_ids.len() * per_game
    }
}

/// Generate the full packet matrix.
///
/// Iteration order is fixed: games in the order given, opcodes in the order
/// given, sub-options ascending. An opcode byte outside the protocol's
/// closed set is reported and skipped; it never aborts the run or affects
/// packets already produced.
pub fn generate(spec: &MatrixSpec) -> Vec<Packet> {
    let mut packets = Vec::with_capacity(spec.packet_count());

    for &game_id in &spec.game_ids {
        for &opcode_byte in &spec.opcodes {
            let opcode = match Opcode::from_byte(opcode_byte) {
                Ok(op) => op,
                Err(err) => {
                    tracing::warn!("skipping matrix entry: {err}");
                    continue;
                }
            };

            let subs = opcode.sub_options();
            let variants: Vec<Option<u8>> = if subs.is_empty() {
                vec![None]
            } else {
                subs.iter().map(|s| Some(*s)).collect()
            };

            for sub in variants {
                match Packet::new(spec.version, opcode, game_id, spec.ttl, sub) {
                    Ok(packet) => packets.push(packet),
                    Err(err) => tracing::warn!("skipping matrix entry: {err}"),
                }
            }
        }
    }

    packets
}
