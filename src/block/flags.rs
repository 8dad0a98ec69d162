use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Static per-`BlockId` flag set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct BlockFlags: u8 {
        const NONE = 0;
        const SOLID = 1 << 0;
        const OPAQUE = 1 << 1;
    }
}

impl BlockFlags {
    pub fn is_solid(self) -> bool {
        self.contains(Self::SOLID)
    }

    pub fn is_opaque(self) -> bool {
        self.contains(Self::OPAQUE)
    }
}

impl Default for BlockFlags {
    fn default() -> Self {
        Self::NONE
    }
}
