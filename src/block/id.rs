use serde::{Deserialize, Serialize};

/// Enumerated block identifier. `0` is the `Air` sentinel. At most 65,535
/// distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct BlockId(pub u16);

impl BlockId {
    pub const AIR: BlockId = BlockId(0);

    pub const fn is_air(self) -> bool {
        self.0 == 0
    }
}

impl Default for BlockId {
    fn default() -> Self {
        BlockId::AIR
    }
}

impl From<u16> for BlockId {
    fn from(id: u16) -> Self {
        BlockId(id)
    }
}

impl From<BlockId> for u16 {
    fn from(id: BlockId) -> Self {
        id.0
    }
}
