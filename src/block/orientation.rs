use serde::{Deserialize, Serialize};

/// 3-bit packed property of a `BlockState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
    Up = 4,
    Down = 5,
}

impl Orientation {
    pub const ALL: [Orientation; 6] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
        Orientation::Up,
        Orientation::Down,
    ];

    pub const fn from_bits(bits: u8) -> Orientation {
        match bits & 0b111 {
            0 => Orientation::North,
            1 => Orientation::East,
            2 => Orientation::South,
            3 => Orientation::West,
            4 => Orientation::Up,
            _ => Orientation::Down,
        }
    }

    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// The `BlockUse` placeholder toggle: advance to the next orientation,
    /// wrapping through the horizontal four before touching up/down.
    pub const fn next(self) -> Orientation {
        match self {
            Orientation::North => Orientation::East,
            Orientation::East => Orientation::South,
            Orientation::South => Orientation::West,
            Orientation::West => Orientation::North,
            Orientation::Up => Orientation::Down,
            Orientation::Down => Orientation::Up,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(
            self,
            Orientation::North | Orientation::East | Orientation::South | Orientation::West
        )
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::North
    }
}
