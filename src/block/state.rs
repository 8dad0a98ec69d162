use super::{BlockId, Orientation};
use serde::{Deserialize, Serialize};

/// Packed `BlockId` + orientation, at most 32 bits. Layout:
/// bits 0..16 = id, bits 16..19 = orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockState(pub u32);

impl BlockState {
    pub const AIR: BlockState = BlockState(0);

    pub fn new(id: BlockId, orientation: Orientation) -> Self {
        BlockState((id.0 as u32) | ((orientation.bits() as u32) << 16))
    }

    pub fn id(self) -> BlockId {
        BlockId(self.0 as u16)
    }

    pub fn orientation(self) -> Orientation {
        Orientation::from_bits((self.0 >> 16) as u8)
    }

    pub fn with_orientation(self, orientation: Orientation) -> Self {
        BlockState::new(self.id(), orientation)
    }

    pub fn is_air(self) -> bool {
        self.id().is_air()
    }
}

impl Default for BlockState {
    fn default() -> Self {
        BlockState::AIR
    }
}

/// Air states compare equal across any properties in presence checks
/// — two air states are always equal regardless of the packed
/// orientation bits, which are meaningless for air.
impl PartialEq<BlockId> for BlockState {
    fn eq(&self, other: &BlockId) -> bool {
        self.id() == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn air_equality_ignores_orientation() {
        let a = BlockState::new(BlockId::AIR, Orientation::North);
        let b = BlockState::new(BlockId::AIR, Orientation::Up);
        assert_eq!(a.id(), b.id());
        assert!(a.is_air() && b.is_air());
    }

    #[test]
    fn round_trips_id_and_orientation() {
        let s = BlockState::new(BlockId(42), Orientation::West);
        assert_eq!(s.id(), BlockId(42));
        assert_eq!(s.orientation(), Orientation::West);
    }
}
