//! Planner constants.
//!
//! Of the two historically distinct "expanded cell" constants, only
//! `VIRTUAL_CELLS` is carried forward; a separate `EXPANDED_CELL` constant
//! never appears in this codebase.

/// Width of the arena in grid cells.
pub const GRID_WIDTH: i32 = 20;

/// Height of the arena in grid cells.
pub const GRID_HEIGHT: i32 = 20;

/// Clearance halo (in cells) required for turn and pre-turn reachability
/// checks, and the standing-back distance for viewing poses.
pub const VIRTUAL_CELLS: i32 = 3;

/// Bigger/smaller displacement components of a standard 90 degree turn arc.
pub const TURN_RADIUS: (i32, i32) = (2, 2);

/// Bigger/smaller displacement components of a "wide" turn arc, used by
/// [`crate::arena::TurnProfile::Wide`].
pub const WIDE_TURN_RADIUS: (i32, i32) = (3, 1);

/// Multiplier applied to rotation cost in the A* edge cost function.
pub const TURN_FACTOR: i64 = 1;

/// Additive cost discouraging passes near an obstacle's corner.
pub const SAFE_COST: i64 = 1000;

/// Additive penalty for an off-centre (left/right) viewing pose.
pub const SCREENSHOT_COST: i64 = 50;

/// Base cost of an accepted turn neighbor.
pub const TURN_BASE_COST: i64 = 10;

/// Additional cost when a turn's intermediate cell is unreachable but the
/// turn is accepted anyway under a relaxed (non-strict) acceptance.
pub const TURN_RELAXED_PENALTY: i64 = 10;

/// Recursive-expansion budget for combination enumeration, per subset.
pub const ITERATIONS: usize = 2000;

/// Robot translation speed, in cells per second, used to convert distance
/// into `duration`.
pub const ROBOT_SPEED: i64 = 2;

/// Sentinel cost for an unreachable pose pair.
pub const UNREACHABLE_COST: i64 = 1_000_000_000;
