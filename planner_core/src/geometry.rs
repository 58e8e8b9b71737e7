//! # Geometry primitives
//!
//! Directions, poses and the grid-cell value type shared by every other
//! module in the planner. The [`Direction`] encoding is load-bearing: it
//! assigns the four cardinal directions (plus `None`) onto the even integers
//! of Z/8, so that a 90 degree turn is `(d +/- 2) mod 8` and the cost of
//! rotating between two directions falls out of a single cyclic distance
//! calculation. Do not renumber these without re-deriving every turn table
//! in [`crate::pathfind`] and [`crate::compile`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A cardinal facing, or `None` for "no viewing direction".
///
/// Serializes to/from the raw integer code (0, 2, 4, 6, 8) used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Direction {
    North = 0,
    East = 2,
    South = 4,
    West = 6,
    /// No facing. Used by obstacles with no visible symbol; never a valid
    /// robot orientation.
    None = 8,
}

/// Errors raised while interpreting geometry values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("direction code {0} is not one of 0, 2, 4, 6, 8")]
    InvalidDirectionCode(i32),
}

// ------------------------------------------------------------------------------------------------
// IMPLS: Direction
// ------------------------------------------------------------------------------------------------

impl Direction {
    /// All four cardinal directions, in clockwise order starting from
    /// north.
    pub const CARDINALS: [Direction; 4] =
        [Direction::North, Direction::East, Direction::South, Direction::West];

    /// The raw wire code for this direction.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// The unit displacement `(dx, dy)` for a single straight step in this
    /// direction. `North` is +y, `East` is +x -- `y` increases "north"
    /// across this whole grid convention.
    ///
    /// Returns `None` for [`Direction::None`], which has no motion.
    pub fn unit_delta(self) -> Option<(i32, i32)> {
        match self {
            Direction::North => Some((0, 1)),
            Direction::East => Some((1, 0)),
            Direction::South => Some((0, -1)),
            Direction::West => Some((-1, 0)),
            Direction::None => None,
        }
    }

    /// The cyclic rotation distance between two directions on Z/8: 0 if
    /// equal, 2 for a 90 degree difference, 4 for a 180 degree difference.
    pub fn rotation_cost(a: Direction, b: Direction) -> i64 {
        let diff = (a.code() - b.code()).abs();
        diff.min(8 - diff) as i64
    }

    /// The direction 180 degrees from this one. Used to derive the robot's
    /// required facing from an obstacle's facing (the robot must face the
    /// obstacle to view its symbol).
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
            Direction::None => Direction::None,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = GeometryError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Direction::North),
            2 => Ok(Direction::East),
            4 => Ok(Direction::South),
            6 => Ok(Direction::West),
            8 => Ok(Direction::None),
            other => Err(GeometryError::InvalidDirectionCode(other)),
        }
    }
}

impl From<Direction> for i32 {
    fn from(d: Direction) -> Self {
        d.code()
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS: Pose
// ------------------------------------------------------------------------------------------------

/// A grid pose: position plus facing. This is the value type every
/// planner table (cost/path memoization, visited sets, parent maps) is keyed
/// on, so it must be compared and hashed by value alone, never by identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
}

impl Pose {
    pub fn new(x: i32, y: i32, dir: Direction) -> Self {
        Self { x, y, dir }
    }

    /// Manhattan (L1) distance to another pose, ignoring direction.
    pub fn manhattan(self, other: Pose) -> i64 {
        ((self.x - other.x).abs() + (self.y - other.y).abs()) as i64
    }
}

/// A [`Pose`] tagged with an optional screenshot id and a viewpoint penalty.
///
/// `screenshot_id` is `-1` unless this is the chosen final viewpoint for an
/// obstacle, in which case it is that obstacle's id. `penalty` is additive
/// tour cost discouraging off-centre viewpoints (`SCREENSHOT_COST` for
/// left/right candidates, `0` for centre).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedPose {
    pub pose: Pose,
    pub screenshot_id: i32,
    pub penalty: i64,
}

impl TaggedPose {
    pub fn new(pose: Pose, screenshot_id: i32, penalty: i64) -> Self {
        Self { pose, screenshot_id, penalty }
    }

    pub fn untagged(pose: Pose) -> Self {
        Self { pose, screenshot_id: -1, penalty: 0 }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
