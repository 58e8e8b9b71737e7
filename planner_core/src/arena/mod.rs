//! # Arena
//!
//! Holds the grid bounds, the obstacle set and the robot's starting pose.
//! Provides the clearance-aware reachability predicate every other module
//! queries before accepting a candidate pose or A* neighbor.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod viewpoint;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::consts::{GRID_HEIGHT, GRID_WIDTH, VIRTUAL_CELLS};
use crate::geometry::{Direction, Pose};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which clearance halo applies when testing whether a cell is safe to
/// occupy.
///
/// The source's `is_reachable(x, y, turn=False, preTurn=False)` passed two
/// booleans that were meant to be exclusive, and its `if turn: ... if
/// preTurn: ... else: ...` has a dangling `else` that binds to `preTurn`,
/// not `turn` -- almost certainly a bug. This enum resolves that ambiguity:
/// `Turn` and `PreTurn` both require the full `VIRTUAL_CELLS` halo,
/// `Straight` is the (smaller, 2-cell) default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearanceMode {
    Straight,
    Turn,
    PreTurn,
}

/// Which turn kinematics the pathfinder should use.
///
/// `Standard` is `TURN_RADIUS = (2, 2)`, the radius spec.md settles on.
/// `Wide` is the source's alternate "big turn" (3, 1) kinematics
/// (`PathFinder.__init__`'s `big_turn` parameter), for drivetrains that
/// prefer a larger turn radius. `Standard` is the default used by every
/// invariant in the specification; `Wide` is an additional opt-in mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnProfile {
    #[default]
    Standard,
    Wide,
}

impl TurnProfile {
    pub fn radius(self) -> (i32, i32) {
        match self {
            TurnProfile::Standard => crate::consts::TURN_RADIUS,
            TurnProfile::Wide => crate::consts::WIDE_TURN_RADIUS,
        }
    }
}

/// Errors raised while building or querying an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ArenaError {
    #[error("obstacle ({x}, {y}) lies outside the arena bounds (0..{max_x}, 0..{max_y})")]
    ObstacleOutOfBounds { x: i32, y: i32, max_x: i32, max_y: i32 },

    #[error("an obstacle already exists at ({x}, {y}) facing {dir:?}")]
    DuplicateObstacle { x: i32, y: i32, dir: Direction },

    #[error("robot start pose ({x}, {y}) is not a valid in-bounds robot position")]
    RobotOutOfBounds { x: i32, y: i32 },
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An obstacle: a facing cell with an identifier. Equality (and the
/// duplicate-rejection check on insertion) is by `(x, y, direction)` alone,
/// per the source's `Obstacle.__eq__`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub dir: Direction,
    pub id: i32,
}

impl Obstacle {
    pub fn new(x: i32, y: i32, dir: Direction, id: i32) -> Self {
        Self { x, y, dir, id }
    }

    pub fn same_cell(&self, other: &Obstacle) -> bool {
        self.x == other.x && self.y == other.y && self.dir == other.dir
    }
}

/// The bounded grid, its obstacles, and the robot's starting pose.
#[derive(Debug, Clone)]
pub struct Arena {
    pub width: i32,
    pub height: i32,
    pub robot_start: Pose,
    obstacles: Vec<Obstacle>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Arena {
    /// Create a new arena with the given dimensions and robot start pose.
    ///
    /// Fails if the robot's start position is not a valid in-bounds robot
    /// position (`1 <= x <= width - 2`, `1 <= y <= height - 2`).
    pub fn new(width: i32, height: i32, robot_start: Pose) -> Result<Self, ArenaError> {
        let arena = Self { width, height, robot_start, obstacles: Vec::new() };
        if !arena.in_bounds(robot_start.x, robot_start.y) {
            return Err(ArenaError::RobotOutOfBounds { x: robot_start.x, y: robot_start.y });
        }
        Ok(arena)
    }

    /// Create a standard 20x20 arena (`GRID_WIDTH` x `GRID_HEIGHT`).
    pub fn standard(robot_start: Pose) -> Result<Self, ArenaError> {
        Self::new(GRID_WIDTH, GRID_HEIGHT, robot_start)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Add an obstacle, rejecting it if it lies outside `[0, width-1] x
    /// [0, height-1]` or duplicates an existing obstacle's `(x, y, dir)`.
    ///
    /// The source silently drops duplicate obstacles on insertion
    /// (`arena.py::add_obstacle`); this keeps that behavior but surfaces the
    /// rejection as a typed, non-fatal error so the caller can choose to log
    /// or ignore it.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) -> Result<(), ArenaError> {
        if obstacle.x < 0 || obstacle.x > self.width - 1 || obstacle.y < 0 || obstacle.y > self.height - 1 {
            return Err(ArenaError::ObstacleOutOfBounds {
                x: obstacle.x,
                y: obstacle.y,
                max_x: self.width - 1,
                max_y: self.height - 1,
            });
        }

        if self.obstacles.iter().any(|ob| ob.same_cell(&obstacle)) {
            return Err(ArenaError::DuplicateObstacle { x: obstacle.x, y: obstacle.y, dir: obstacle.dir });
        }

        self.obstacles.push(obstacle);
        Ok(())
    }

    /// True iff `(x, y)` is a valid robot position: `1 <= x <= width - 2`
    /// and `1 <= y <= height - 2`. The outer ring is never a valid robot
    /// position.
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 1 && x <= self.width - 2 && y >= 1 && y <= self.height - 2
    }

    /// True iff `(x, y)` is in-bounds and clears every obstacle under the
    /// given [`ClearanceMode`].
    ///
    /// See spec.md 4.1 for the exact carve-out and halo rules: obstacles
    /// near the origin corner are skipped when the query point is also near
    /// it (so the start region stays navigable even when obstacles cluster
    /// there); obstacles at Manhattan distance >= 4 are skipped outright;
    /// otherwise the mode-specific Chebyshev halo applies.
    pub fn reachable(&self, x: i32, y: i32, mode: ClearanceMode) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }

        for ob in &self.obstacles {
            if ob.x <= 4 && ob.y <= 4 && x < 4 && y < 4 {
                continue;
            }

            if (ob.x - x).abs() + (ob.y - y).abs() >= 4 {
                continue;
            }

            let cheby = (ob.x - x).abs().max((ob.y - y).abs());
            let required = match mode {
                ClearanceMode::Turn | ClearanceMode::PreTurn => VIRTUAL_CELLS,
                ClearanceMode::Straight => 2,
            };
            if cheby < required {
                return false;
            }
        }

        true
    }

    /// True iff an obstacle sits close enough to `(x, y)` to warrant the
    /// A* safe-cost halo: `|dx|, |dy|` in `{(2,2), (1,2), (2,1)}`.
    pub fn near_obstacle_corner(&self, x: i32, y: i32) -> bool {
        self.obstacles.iter().any(|ob| {
            let dx = (ob.x - x).abs();
            let dy = (ob.y - y).abs();
            (dx == 2 && dy == 2) || (dx == 1 && dy == 2) || (dx == 2 && dy == 1)
        })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn arena() -> Arena {
        Arena::standard(Pose::new(1, 1, Direction::North)).unwrap()
    }

    #[test]
    fn bounds_exclude_outer_ring() {
        let a = arena();
        assert!(a.in_bounds(1, 1));
        assert!(a.in_bounds(18, 18));
        assert!(!a.in_bounds(0, 1));
        assert!(!a.in_bounds(1, 0));
        assert!(!a.in_bounds(19, 1));
        assert!(!a.in_bounds(1, 19));
    }

    #[test]
    fn duplicate_obstacle_rejected() {
        let mut a = arena();
        a.add_obstacle(Obstacle::new(5, 5, Direction::North, 1)).unwrap();
        let err = a.add_obstacle(Obstacle::new(5, 5, Direction::North, 2)).unwrap_err();
        assert!(matches!(err, ArenaError::DuplicateObstacle { .. }));
        assert_eq!(a.obstacles().len(), 1);
    }

    #[test]
    fn obstacle_out_of_grid_rejected() {
        let mut a = arena();
        let err = a.add_obstacle(Obstacle::new(50, 5, Direction::North, 1)).unwrap_err();
        assert!(matches!(err, ArenaError::ObstacleOutOfBounds { .. }));
    }

    #[test]
    fn origin_corner_carve_out_allows_tight_clusters() {
        let mut a = arena();
        a.add_obstacle(Obstacle::new(3, 3, Direction::North, 1)).unwrap();
        // both the obstacle and the query point are inside the x<4, y<4 carve-out
        assert!(a.reachable(1, 1, ClearanceMode::Straight));
    }

    #[test]
    fn far_obstacle_does_not_block() {
        let mut a = arena();
        a.add_obstacle(Obstacle::new(15, 15, Direction::North, 1)).unwrap();
        assert!(a.reachable(1, 1, ClearanceMode::Straight));
    }

    #[test]
    fn straight_halo_smaller_than_turn_halo() {
        let mut a = arena();
        // obstacle at (10, 10): point (8, 10) is Chebyshev distance 2 away,
        // clearing the straight halo (>= 2) but not the turn halo (>= 3).
        a.add_obstacle(Obstacle::new(10, 10, Direction::North, 1)).unwrap();
        assert!(a.reachable(8, 10, ClearanceMode::Straight));
        assert!(!a.reachable(8, 10, ClearanceMode::Turn));
        assert!(!a.reachable(8, 10, ClearanceMode::PreTurn));
    }
}
