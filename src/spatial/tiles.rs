//! Tile identifiers, border sides and rotations
//!
//! A tile is known to the solvers only through its [`TileId`], the index it
//! occupies in the shuffled grid. Its original position is a separate
//! [`SourceIndex`] that only the ground truth can resolve. Keeping the two as
//! distinct types prevents a shuffled index from being compared against a
//! source position by accident.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Working index of a tile in the shuffled grid (`0..N-1`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub usize);

impl TileId {
    /// Raw index value
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Original position of a tile in the unshuffled image (`row * grid_size + col`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceIndex(pub usize);

impl SourceIndex {
    /// Raw index value
    pub const fn index(self) -> usize {
        self.0
    }

    /// Source index of the cell at `(row, col)` in a grid of `grid_size` columns
    pub const fn from_cell(row: usize, col: usize, grid_size: usize) -> Self {
        Self(row * grid_size + col)
    }
}

/// One of the four edges of a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Border {
    /// Upper edge
    Top,
    /// Right edge
    Right,
    /// Lower edge
    Bottom,
    /// Left edge
    Left,
}

impl Border {
    /// All borders in clockwise order starting from the top
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The edge that touches this one when two tiles are placed side by side
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Clockwise position of the border (top = 0)
    pub const fn index(self) -> usize {
        match self {
            Self::Top => 0,
            Self::Right => 1,
            Self::Bottom => 2,
            Self::Left => 3,
        }
    }

    /// Border at a clockwise position, wrapping modulo four
    pub const fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Self::Top,
            1 => Self::Right,
            2 => Self::Bottom,
            _ => Self::Left,
        }
    }

    /// Border of the unrotated tile that ends up facing `self` once the tile
    /// is turned clockwise by `rotation`
    ///
    /// A quarter turn brings the left edge to the top.
    pub const fn rotated_source(self, rotation: Rotation) -> Self {
        Self::from_index(self.index() + 4 - rotation.quarter_turns())
    }

    /// Lowercase name used in reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }
}

impl fmt::Display for Border {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clockwise rotation applied to a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    /// No rotation
    #[default]
    R0,
    /// Quarter turn clockwise
    R90,
    /// Half turn
    R180,
    /// Three quarter turns clockwise
    R270,
}

impl Rotation {
    /// All rotations in ascending order
    pub const ALL: [Self; 4] = [Self::R0, Self::R90, Self::R180, Self::R270];

    /// Rotation angle in degrees
    pub const fn degrees(self) -> u16 {
        match self {
            Self::R0 => 0,
            Self::R90 => 90,
            Self::R180 => 180,
            Self::R270 => 270,
        }
    }

    /// Number of clockwise quarter turns
    pub const fn quarter_turns(self) -> usize {
        match self {
            Self::R0 => 0,
            Self::R90 => 1,
            Self::R180 => 2,
            Self::R270 => 3,
        }
    }

    /// Rotation made of `turns` clockwise quarter turns, wrapping modulo four
    pub const fn from_quarter_turns(turns: usize) -> Self {
        match turns % 4 {
            0 => Self::R0,
            1 => Self::R90,
            2 => Self::R180,
            _ => Self::R270,
        }
    }

    /// Parse an angle; only multiples of 90 below 360 are valid
    pub const fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::R0),
            90 => Some(Self::R90),
            180 => Some(Self::R180),
            270 => Some(Self::R270),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Self::from_degrees(degrees)
            .ok_or_else(|| format!("rotation must be 0, 90, 180 or 270 degrees, got {degrees}"))
    }
}

/// One value per border, addressed by [`Border`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerBorder<T> {
    /// Value for the upper edge
    pub top: T,
    /// Value for the right edge
    pub right: T,
    /// Value for the lower edge
    pub bottom: T,
    /// Value for the left edge
    pub left: T,
}

impl<T> PerBorder<T> {
    /// Build from a function of the border
    pub fn from_fn(mut f: impl FnMut(Border) -> T) -> Self {
        Self {
            top: f(Border::Top),
            right: f(Border::Right),
            bottom: f(Border::Bottom),
            left: f(Border::Left),
        }
    }

    /// Value for a border
    pub const fn get(&self, border: Border) -> &T {
        match border {
            Border::Top => &self.top,
            Border::Right => &self.right,
            Border::Bottom => &self.bottom,
            Border::Left => &self.left,
        }
    }

    /// Mutable value for a border
    pub const fn get_mut(&mut self, border: Border) -> &mut T {
        match border {
            Border::Top => &mut self.top,
            Border::Right => &mut self.right,
            Border::Bottom => &mut self.bottom,
            Border::Left => &mut self.left,
        }
    }

    /// Iterate `(border, value)` in clockwise order
    pub fn iter(&self) -> impl Iterator<Item = (Border, &T)> {
        Border::ALL.into_iter().map(move |border| (border, self.get(border)))
    }
}

/// One value per rotation, addressed by [`Rotation`]
///
/// Serialized with the degree values as keys (`"0"`, `"90"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerRotation<T> {
    /// Value for the unrotated tile
    #[serde(rename = "0")]
    pub r0: T,
    /// Value after a quarter turn
    #[serde(rename = "90")]
    pub r90: T,
    /// Value after a half turn
    #[serde(rename = "180")]
    pub r180: T,
    /// Value after three quarter turns
    #[serde(rename = "270")]
    pub r270: T,
}

impl<T> PerRotation<T> {
    /// Build from a function of the rotation
    pub fn from_fn(mut f: impl FnMut(Rotation) -> T) -> Self {
        Self {
            r0: f(Rotation::R0),
            r90: f(Rotation::R90),
            r180: f(Rotation::R180),
            r270: f(Rotation::R270),
        }
    }

    /// Value for a rotation
    pub const fn get(&self, rotation: Rotation) -> &T {
        match rotation {
            Rotation::R0 => &self.r0,
            Rotation::R90 => &self.r90,
            Rotation::R180 => &self.r180,
            Rotation::R270 => &self.r270,
        }
    }

    /// Iterate `(rotation, value)` in ascending rotation order
    pub fn iter(&self) -> impl Iterator<Item = (Rotation, &T)> {
        Rotation::ALL
            .into_iter()
            .map(move |rotation| (rotation, self.get(rotation)))
    }
}
