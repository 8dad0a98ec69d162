//! Network transport seam. The core pins wire framing and
//! opcodes; actual socket I/O is a collaborator that implements `Host` and
//! `Client` against a concrete TCP+UDP transport. The simulation only ever
//! drains already-decoded packets from a queue once per tick.

pub mod opcode;
pub mod packet;
pub mod peer;

pub use opcode::Opcode;
pub use packet::{Packet, PacketHeader, HEADER_LEN};
pub use peer::PeerState;

use crate::error::EngineResult;

/// Server-side transport seam: accepts connections, rebroadcasts
/// `PositionUpdate`, and surfaces decoded packets to the simulation thread.
pub trait Host {
    /// Non-blocking; returns packets decoded since the last call.
    fn poll(&mut self) -> Vec<Packet>;

    fn send_to(&mut self, destination_id: u64, packet: &Packet) -> EngineResult<()>;

    fn broadcast(&mut self, packet: &Packet, exclude: Option<u64>) -> EngineResult<()>;

    fn disconnect(&mut self, peer_id: u64);
}

/// Client-side transport seam: same shape as `Host` but talks to exactly
/// one server connection.
pub trait Client {
    fn poll(&mut self) -> Vec<Packet>;

    fn send(&mut self, packet: &Packet) -> EngineResult<()>;

    fn is_connected(&self) -> bool;
}
