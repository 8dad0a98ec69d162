//! Fixed packet header + framing. The core only pins the header
//! layout and opcode set; payload interpretation beyond framing is left to
//! the transport collaborator.

use crate::error::{EngineError, EngineResult};

use super::opcode::Opcode;

pub const HEADER_LEN: usize = 1 + 8 + 8 + 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub opcode: Opcode,
    pub source_id: u64,
    pub destination_id: u64,
    pub payload_len: u32,
}

impl PacketHeader {
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode as u8);
        out.extend_from_slice(&self.source_id.to_le_bytes());
        out.extend_from_slice(&self.destination_id.to_le_bytes());
        out.extend_from_slice(&self.payload_len.to_le_bytes());
    }

    pub fn decode(bytes: &[u8]) -> EngineResult<PacketHeader> {
        if bytes.len() < HEADER_LEN {
            return Err(EngineError::PacketDecodeFailed(format!(
                "header needs {HEADER_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let opcode = Opcode::from_byte(bytes[0])
            .ok_or_else(|| EngineError::PacketDecodeFailed(format!("unknown opcode {:#x}", bytes[0])))?;
        let source_id = u64::from_le_bytes(bytes[1..9].try_into().unwrap());
        let destination_id = u64::from_le_bytes(bytes[9..17].try_into().unwrap());
        let payload_len = u32::from_le_bytes(bytes[17..21].try_into().unwrap());
        Ok(PacketHeader { opcode, source_id, destination_id, payload_len })
    }
}

/// A decoded header plus its payload bytes, still opcode-specific on the
/// far side of this boundary.
#[derive(Debug, Clone)]
pub struct Packet {
    pub header: PacketHeader,
    pub payload: Vec<u8>,
}

impl Packet {
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.payload.len());
        self.header.encode(&mut out);
        out.extend_from_slice(&self.payload);
        out
    }

    pub fn decode(bytes: &[u8]) -> EngineResult<Packet> {
        let header = PacketHeader::decode(bytes)?;
        let payload_start = HEADER_LEN;
        let payload_end = payload_start + header.payload_len as usize;
        let payload = bytes
            .get(payload_start..payload_end)
            .ok_or_else(|| EngineError::PacketDecodeFailed("payload shorter than payloadLen".into()))?
            .to_vec();
        Ok(Packet { header, payload })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = PacketHeader { opcode: Opcode::PositionUpdate, source_id: 7, destination_id: 0, payload_len: 12 };
        let mut bytes = Vec::new();
        header.encode(&mut bytes);
        assert_eq!(PacketHeader::decode(&bytes).unwrap(), header);
    }

    #[test]
    fn packet_round_trips_with_payload() {
        let packet = Packet {
            header: PacketHeader { opcode: Opcode::Chat, source_id: 1, destination_id: 2, payload_len: 5 },
            payload: b"hello".to_vec(),
        };
        let bytes = packet.encode();
        let decoded = Packet::decode(&bytes).unwrap();
        assert_eq!(decoded.header, packet.header);
        assert_eq!(decoded.payload, packet.payload);
    }

    #[test]
    fn truncated_header_fails_to_decode() {
        assert!(PacketHeader::decode(&[0x01, 0x02]).is_err());
    }

    #[test]
    fn unknown_opcode_byte_fails_to_decode() {
        let mut bytes = vec![0xFFu8];
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&0u64.to_le_bytes());
        bytes.extend_from_slice(&0u32.to_le_bytes());
        assert!(PacketHeader::decode(&bytes).is_err());
    }
}
