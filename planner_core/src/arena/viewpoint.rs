//! # Viewing poses
//!
//! For each obstacle, generates the candidate poses the robot could stop at
//! to photograph its facing symbol: directly in front (`Center`), and one
//! cell either side of centre (`Left`/`Right`), standing back far enough
//! that the turn/pre-turn clearance halo clears the obstacle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use crate::arena::Obstacle;
use crate::consts::{SCREENSHOT_COST, VIRTUAL_CELLS};
use crate::geometry::{Direction, Pose, TaggedPose};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Which of the three candidate viewing poses a [`TaggedPose`] was derived
/// from. Exposed for diagnostics (`PlanReport`); not required to drive the
/// planner itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewSlot {
    Center,
    Left,
    Right,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// How far back (in cells) from the obstacle the robot should stand.
///
/// The first attempt at a pose stands `VIRTUAL_CELLS` back, clearing the
/// turn halo by exactly one cell. `retrying` asks for one cell further back
/// still, used when the first round of candidates for this obstacle turned
/// out to be unreachable from every other viewpoint in the tour.
pub fn standoff_distance(retrying: bool) -> i32 {
    VIRTUAL_CELLS + if retrying { 2 } else { 1 }
}

/// Generate the `(slot, pose)` candidates for viewing `obstacle`, in
/// `Center, Left, Right` order.
///
/// Each candidate stands `standoff_distance(retrying)` cells out along the
/// obstacle's facing direction, and faces back towards the obstacle
/// ([`Direction::opposite`]). `Left`/`Right` are offset by one cell along
/// the perpendicular axis and carry [`SCREENSHOT_COST`] as an additive
/// penalty; `Center` is free.
///
/// Returns an empty vec for an obstacle with [`Direction::None`], which has
/// no facing to stand in front of.
pub fn candidates(obstacle: &Obstacle, retrying: bool) -> Vec<(ViewSlot, TaggedPose)> {
    let Some((dx, dy)) = obstacle.dir.unit_delta() else {
        return Vec::new();
    };

    let extra = standoff_distance(retrying);
    let facing = obstacle.dir.opposite();
    let base_x = obstacle.x + extra * dx;
    let base_y = obstacle.y + extra * dy;

    // perpendicular unit vector for the left offset (spec.md 4.2's table:
    // e.g. a north-facing obstacle's left candidate is (x+1, y+e)).
    let (px, py) = (dy, -dx);

    let center = Pose::new(base_x, base_y, facing);
    let left = Pose::new(base_x + px, base_y + py, facing);
    let right = Pose::new(base_x - px, base_y - py, facing);

    vec![
        (ViewSlot::Center, TaggedPose::new(center, obstacle.id, 0)),
        (ViewSlot::Left, TaggedPose::new(left, obstacle.id, SCREENSHOT_COST)),
        (ViewSlot::Right, TaggedPose::new(right, obstacle.id, SCREENSHOT_COST)),
    ]
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn north_facing_obstacle_is_viewed_from_the_north_facing_south() {
        let ob = Obstacle::new(5, 5, Direction::North, 7);
        let cands = candidates(&ob, false);
        assert_eq!(cands.len(), 3);
        let (slot, center) = cands[0];
        assert_eq!(slot, ViewSlot::Center);
        assert_eq!(center.pose.dir, Direction::South);
        assert_eq!(center.pose.y, 5 + standoff_distance(false));
        assert_eq!(center.pose.x, 5);
        assert_eq!(center.penalty, 0);
    }

    #[test]
    fn left_right_match_the_per_direction_table() {
        // spec.md 4.2: a north-facing obstacle's Left candidate is
        // (x+1, y+e), Right is (x-1, y+e); an east-facing obstacle's Left
        // is (x+e, y-1), Right is (x+e, y+1).
        let north = Obstacle::new(5, 5, Direction::North, 1);
        let cands = candidates(&north, false);
        let e = standoff_distance(false);
        assert_eq!(cands[1].1.pose, Pose::new(5 + 1, 5 + e, Direction::South));
        assert_eq!(cands[2].1.pose, Pose::new(5 - 1, 5 + e, Direction::South));

        let east = Obstacle::new(5, 5, Direction::East, 2);
        let cands = candidates(&east, false);
        assert_eq!(cands[1].1.pose, Pose::new(5 + e, 5 - 1, Direction::West));
        assert_eq!(cands[2].1.pose, Pose::new(5 + e, 5 + 1, Direction::West));
    }

    #[test]
    fn left_and_right_are_offset_and_penalised() {
        let ob = Obstacle::new(5, 5, Direction::North, 7);
        let cands = candidates(&ob, false);
        for (slot, tagged) in &cands[1..] {
            assert_ne!(*slot, ViewSlot::Center);
            assert_eq!(tagged.penalty, SCREENSHOT_COST);
            assert_eq!(tagged.pose.y, cands[0].1.pose.y);
            assert_ne!(tagged.pose.x, cands[0].1.pose.x);
        }
    }

    #[test]
    fn retrying_stands_one_cell_further_back() {
        assert_eq!(standoff_distance(false) + 1, standoff_distance(true));
    }

    #[test]
    fn direction_none_has_no_candidates() {
        let ob = Obstacle::new(5, 5, Direction::None, 7);
        assert!(candidates(&ob, false).is_empty());
    }
}
