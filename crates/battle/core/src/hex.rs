//! Battlefield geometry.
//!
//! The field is a 17x11 grid of hexes in "even-r" offset layout: even rows are
//! shifted half a hex to the right of odd rows. Each hex is addressed by a
//! single index `y * FIELD_WIDTH + x`. Columns 0 and 16 belong to the field
//! but are reserved for war machines and never available for movement.

use std::fmt;

use arrayvec::ArrayVec;

use crate::config::BattleConfig;

/// Neighbour direction, clockwise starting from the top-left edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HexDirection {
    TopLeft,
    TopRight,
    Right,
    BottomRight,
    BottomLeft,
    Left,
}

impl HexDirection {
    pub const ALL: [Self; 6] = [
        Self::TopLeft,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::BottomLeft,
        Self::Left,
    ];
}

/// A single hex of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleHex(i16);

impl BattleHex {
    pub const INVALID: Self = Self(-1);

    const WIDTH: i16 = BattleConfig::FIELD_WIDTH as i16;
    const HEIGHT: i16 = BattleConfig::FIELD_HEIGHT as i16;

    /// Creates a hex from its raw index. Out-of-field indices yield [`Self::INVALID`].
    pub const fn new(index: i16) -> Self {
        if index >= 0 && index < Self::WIDTH * Self::HEIGHT {
            Self(index)
        } else {
            Self::INVALID
        }
    }

    /// Creates a hex from column/row coordinates.
    pub const fn from_xy(x: i16, y: i16) -> Self {
        if x < 0 || y < 0 || x >= Self::WIDTH || y >= Self::HEIGHT {
            Self::INVALID
        } else {
            Self(y * Self::WIDTH + x)
        }
    }

    pub const fn index(self) -> i16 {
        self.0
    }

    pub const fn x(self) -> i16 {
        self.0 % Self::WIDTH
    }

    pub const fn y(self) -> i16 {
        self.0 / Self::WIDTH
    }

    pub const fn is_valid(self) -> bool {
        self.0 >= 0 && self.0 < Self::WIDTH * Self::HEIGHT
    }

    /// True for hexes units may stand on (valid and outside the war machine columns).
    pub const fn is_available(self) -> bool {
        self.is_valid() && self.x() > 0 && self.x() < Self::WIDTH - 1
    }

    /// Returns the neighbour in `direction`, or [`Self::INVALID`] past the field edge.
    pub const fn step(self, direction: HexDirection) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }
        let (x, y) = (self.x(), self.y());
        let odd = y % 2 == 1;
        match direction {
            HexDirection::TopLeft => Self::from_xy(if odd { x - 1 } else { x }, y - 1),
            HexDirection::TopRight => Self::from_xy(if odd { x } else { x + 1 }, y - 1),
            HexDirection::Right => Self::from_xy(x + 1, y),
            HexDirection::BottomRight => Self::from_xy(if odd { x } else { x + 1 }, y + 1),
            HexDirection::BottomLeft => Self::from_xy(if odd { x - 1 } else { x }, y + 1),
            HexDirection::Left => Self::from_xy(x - 1, y),
        }
    }

    /// All valid neighbours in clockwise order.
    pub fn neighbours(self) -> ArrayVec<BattleHex, 6> {
        HexDirection::ALL
            .iter()
            .map(|&d| self.step(d))
            .filter(|h| h.is_valid())
            .collect()
    }

    pub fn is_adjacent(self, other: BattleHex) -> bool {
        self.is_valid() && other.is_valid() && Self::distance(self, other) == 1
    }

    /// Hex distance, counted in steps between neighbouring hexes.
    pub fn distance(a: BattleHex, b: BattleHex) -> u32 {
        let (aq, ar) = a.axial();
        let (bq, br) = b.axial();
        let dq = aq - bq;
        let dr = ar - br;
        ((dq.abs() + dr.abs() + (dq + dr).abs()) / 2) as u32
    }

    fn axial(self) -> (i32, i32) {
        let x = self.x() as i32;
        let y = self.y() as i32;
        (x - (y + (y & 1)) / 2, y)
    }

    /// Iterates every hex of the field, row by row.
    pub fn all() -> impl Iterator<Item = BattleHex> {
        (0..Self::WIDTH * Self::HEIGHT).map(BattleHex)
    }
}

impl Default for BattleHex {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for BattleHex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "({}, {})", self.x(), self.y())
        } else {
            f.write_str("(invalid)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbours_are_all_at_distance_one() {
        for hex in [BattleHex::from_xy(5, 2), BattleHex::from_xy(5, 3), BattleHex::from_xy(1, 0)] {
            for n in hex.neighbours() {
                assert_eq!(BattleHex::distance(hex, n), 1, "{hex} -> {n}");
            }
        }
    }

    #[test]
    fn corner_hex_has_fewer_neighbours() {
        assert_eq!(BattleHex::from_xy(0, 0).neighbours().len(), 3);
        assert_eq!(BattleHex::from_xy(8, 5).neighbours().len(), 6);
    }

    #[test]
    fn distance_across_rows() {
        let a = BattleHex::from_xy(2, 0);
        let b = BattleHex::from_xy(2, 4);
        assert_eq!(BattleHex::distance(a, b), 4);
        assert_eq!(BattleHex::distance(a, BattleHex::from_xy(10, 0)), 8);
    }

    #[test]
    fn war_machine_columns_are_not_available() {
        assert!(!BattleHex::from_xy(0, 3).is_available());
        assert!(!BattleHex::from_xy(16, 3).is_available());
        assert!(BattleHex::from_xy(15, 3).is_available());
        assert!(!BattleHex::INVALID.is_available());
        assert_eq!(BattleHex::from_xy(17, 0), BattleHex::INVALID);
    }
}
